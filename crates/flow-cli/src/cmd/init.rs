use crate::output::{print_file_outcome, print_json};
use anyhow::Context;
use colored::Colorize;
use flow_core::project::{self, ProjectContextInput};
use std::path::Path;

pub fn run(
    root: &Path,
    name: Option<String>,
    mission: Option<String>,
    goals: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let project_name = name.or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
    });
    let input = ProjectContextInput {
        project_name,
        mission,
        goals,
        ..ProjectContextInput::default()
    };

    let report = project::init_project(root, &input)
        .with_context(|| format!("failed to initialize flow in {}", root.display()))?;

    if json {
        print_json(&report)?;
        return Ok(());
    }

    println!("{}", "Initializing Flow...".cyan().bold());
    if !report.state_dir_created {
        println!("  {} .flow (already exists)", "exists: ".yellow());
    }
    print_file_outcome(root, &report.project_context);
    print_file_outcome(root, &report.config);
    print_file_outcome(root, &report.agents);
    println!("{}", "Flow initialized.".green().bold());
    Ok(())
}
