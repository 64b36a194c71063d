use crate::output::{display_path, print_file_outcome, print_json};
use anyhow::Context;
use colored::Colorize;
use flow_core::config::Config;
use flow_core::project::FileStatus;
use flow_core::writer::{self, CreateTaskRequest};
use std::path::Path;

pub struct CreateOptions<'a> {
    pub name: &'a str,
    pub task_type: Option<&'a str>,
    pub description: Option<&'a str>,
    pub auto_generate: bool,
}

pub fn run(root: &Path, opts: CreateOptions<'_>, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load .flow/config.yaml")?;
    let req = CreateTaskRequest::from_options(
        &cfg,
        opts.name,
        opts.task_type,
        opts.description,
        opts.auto_generate.then_some(true),
    );
    let created = writer::create_task(root, &req)
        .with_context(|| format!("failed to create task '{}'", opts.name))?;

    if json {
        print_json(&created)?;
        return Ok(());
    }

    let profile = created.task_type.profile();
    println!(
        "{} {} {} ({})",
        "Created".green().bold(),
        created.dir_name,
        profile.icon,
        created.task_type
    );
    println!("  path: {}", display_path(root, &created.path));
    for file in &created.files_created {
        println!("  {} {file}", "created:".green());
    }
    for outcome in created
        .project_files
        .iter()
        .filter(|f| f.status == FileStatus::Created)
    {
        print_file_outcome(root, outcome);
    }
    Ok(())
}
