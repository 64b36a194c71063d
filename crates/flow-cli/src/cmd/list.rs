use crate::output::{print_json, print_table};
use anyhow::Context;
use flow_core::{paths, scan};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let tasks = scan::list_tasks(root).context("failed to list tasks")?;

    if json {
        print_json(&tasks)?;
        return Ok(());
    }

    if !paths::state_dir(root).is_dir() {
        println!("No .flow directory found. Create a task with 'flow <NAME>' or run 'flow init'.");
        return Ok(());
    }
    if tasks.is_empty() {
        println!("No tasks yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.entry.number_label(),
                format!("{} {}", t.task_type.icon(), t.task_type),
                t.entry.name.clone(),
                t.status.label().to_string(),
            ]
        })
        .collect();
    print_table(&["#", "TYPE", "NAME", "STATUS"], rows);
    println!();
    println!("Total: {} task(s)", tasks.len());
    Ok(())
}
