use crate::output::{display_path, print_json};
use anyhow::Context;
use clap::Subcommand;
use colored::Colorize;
use flow_core::project::{self, ProjectContextInput};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum ContextSubcommand {
    /// Rewrite .flow/PROJECT_CONTEXT.md (omitted sections get defaults)
    Update {
        /// JSON file with the full project context (same shape as the MCP tool arguments)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Project name
        #[arg(long)]
        name: Option<String>,
        /// Mission statement
        #[arg(long)]
        mission: Option<String>,
        /// Long-term goal (repeatable)
        #[arg(long = "goal")]
        goals: Vec<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: ContextSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ContextSubcommand::Update {
            input,
            name,
            mission,
            goals,
            notes,
        } => {
            let mut ctx = match input {
                Some(path) => read_input(&path)?,
                None => ProjectContextInput::default(),
            };
            // Flags override the file.
            if name.is_some() {
                ctx.project_name = name;
            }
            if mission.is_some() {
                ctx.mission = mission;
            }
            if !goals.is_empty() {
                ctx.goals = goals;
            }
            if notes.is_some() {
                ctx.notes = notes;
            }
            update(root, &ctx, json)
        }
    }
}

fn read_input(path: &Path) -> anyhow::Result<ProjectContextInput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid project context in {}", path.display()))
}

fn update(root: &Path, ctx: &ProjectContextInput, json: bool) -> anyhow::Result<()> {
    let update = project::update_project_context(root, ctx)
        .context("failed to write PROJECT_CONTEXT.md")?;

    if json {
        print_json(&update)?;
        return Ok(());
    }

    println!(
        "  {} {}",
        format!("{}:", update.file.status.as_str()).green(),
        display_path(root, &update.file.path)
    );
    if update.sections.is_empty() {
        println!("  no sections provided; defaults written");
    } else {
        println!("  sections: {}", update.sections.join(", "));
    }
    Ok(())
}
