use colored::Colorize;
use flow_core::project::{FileOutcome, FileStatus};
use serde::Serialize;
use std::path::Path;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    // Calculate column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").bold());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// Path shown relative to `root` when it lies inside it.
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// `  created: PROJECT_CONTEXT.md` style line for a project file.
pub fn print_file_outcome(root: &Path, outcome: &FileOutcome) {
    let label = match outcome.status {
        FileStatus::Created => "created:".green(),
        FileStatus::Updated => "updated:".green(),
        FileStatus::Exists => "exists: ".yellow(),
    };
    let note = if outcome.status == FileStatus::Exists {
        " (already exists)"
    } else {
        ""
    };
    println!("  {label} {}{note}", display_path(root, &outcome.path));
}
