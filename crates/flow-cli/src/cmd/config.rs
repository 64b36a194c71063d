use crate::output::{display_path, print_json};
use anyhow::Context;
use clap::Subcommand;
use flow_core::config::Config;
use flow_core::paths;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration (defaults filled in)
    Show,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load .flow/config.yaml")?;
    if json {
        print_json(&cfg)?;
        return Ok(());
    }

    let path = paths::config_path(root);
    let source = if path.exists() {
        display_path(root, &path)
    } else {
        "defaults (no config file)".to_string()
    };
    let (agents_path, exists) = cfg.locate_agents_md(root);

    println!("source:            {source}");
    println!("agents_location:   {}", cfg.agents_location);
    println!("default_task_type: {}", cfg.default_task_type);
    println!("auto_generate:     {}", cfg.auto_generate);
    println!(
        "agents file:       {}{}",
        display_path(root, &agents_path),
        if exists { "" } else { " (missing)" }
    );
    Ok(())
}
