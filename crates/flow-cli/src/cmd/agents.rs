use crate::output::{display_path, print_json};
use crate::render;
use anyhow::Context;
use clap::Subcommand;
use colored::Colorize;
use flow_core::agents::{self, AgentsAction, AgentsUpdateOptions};
use std::path::Path;

#[derive(Subcommand)]
pub enum AgentsSubcommand {
    /// Report whether AGENTS.md carries the current Flow section
    Check {
        /// Print the current and template sections
        #[arg(long)]
        details: bool,
    },

    /// Refresh the Flow section of AGENTS.md
    Update {
        /// Rewrite even when up to date; replace the file when it has no Flow section
        #[arg(long)]
        force: bool,
        /// Do not write AGENTS.md.bak first
        #[arg(long)]
        no_backup: bool,
        /// Replace the whole file with the template
        #[arg(long)]
        replace_all: bool,
    },
}

pub fn run(root: &Path, subcmd: AgentsSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        AgentsSubcommand::Check { details } => check(root, details, json),
        AgentsSubcommand::Update {
            force,
            no_backup,
            replace_all,
        } => update(
            root,
            AgentsUpdateOptions {
                force,
                backup: !no_backup,
                preserve_customizations: !replace_all,
            },
            json,
        ),
    }
}

fn check(root: &Path, details: bool, json: bool) -> anyhow::Result<()> {
    let check = agents::check_agents(root).context("failed to check AGENTS.md")?;
    if json {
        print_json(&check)?;
    } else {
        println!("{}", render::agents_check(&check, details).trim_end());
    }
    Ok(())
}

fn update(root: &Path, opts: AgentsUpdateOptions, json: bool) -> anyhow::Result<()> {
    let update = agents::update_agents(root, opts).context("failed to update AGENTS.md")?;
    if json {
        print_json(&update)?;
        return Ok(());
    }

    let label = match update.action {
        AgentsAction::Unchanged => "unchanged:".yellow(),
        _ => format!("{}:", update.action.as_str()).green(),
    };
    println!("  {label} {}", display_path(root, &update.path));
    if let Some(backup) = &update.backup {
        println!("  {} {}", "backup:".dimmed(), display_path(root, backup));
    }
    Ok(())
}
