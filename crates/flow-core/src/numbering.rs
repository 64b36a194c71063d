//! Task directory numbering and lookup.
//!
//! Every task lives in `.flow/NN_<name>` where `NN` is a zero-padded two-digit
//! sequence number. The next number is re-derived from disk on every call, so
//! directories added or removed out of process are always taken into account.
//!
//! Two processes creating tasks at the same moment can both observe the same
//! maximum and pick the same number. Flow is a single-user tool and does not
//! lock the state directory; creation fails with `TaskDirExists` for the loser
//! of such a race rather than writing into the winner's directory.

use crate::error::{FlowError, Result};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Highest number that still renders as two digits.
pub const MAX_SEQUENCE: u32 = 99;

static TASK_DIR_RE: OnceLock<Regex> = OnceLock::new();

fn task_dir_re() -> &'static Regex {
    TASK_DIR_RE.get_or_init(|| Regex::new(r"^([0-9]{2})_(.*)$").unwrap())
}

/// A directory under the state directory whose name matches `^\d{2}_`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDirEntry {
    pub number: u32,
    pub name: String,
    pub dir_name: String,
    pub path: PathBuf,
}

impl TaskDirEntry {
    /// Zero-padded number as shown in listings.
    pub fn number_label(&self) -> String {
        format!("{:02}", self.number)
    }
}

/// Split `NN_name` into its number and name. `None` for non-task names.
pub fn parse_task_dir_name(dir_name: &str) -> Option<(u32, &str)> {
    let caps = task_dir_re().captures(dir_name)?;
    let number = caps.get(1)?.as_str().parse().ok()?;
    Some((number, caps.get(2)?.as_str()))
}

/// All task directories in `state_dir`, ordered by number then name.
///
/// A missing state directory is treated as empty.
pub fn scan(state_dir: &Path) -> Result<Vec<TaskDirEntry>> {
    if !state_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(state_dir)? {
        let entry = entry?;
        // Follows symlinks: a linked task directory still holds its number.
        if !entry.path().is_dir() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(dir_name) = file_name.to_str() else {
            continue;
        };
        if let Some((number, name)) = parse_task_dir_name(dir_name) {
            entries.push(TaskDirEntry {
                number,
                name: name.to_string(),
                dir_name: dir_name.to_string(),
                path: entry.path(),
            });
        }
    }
    entries.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.dir_name.cmp(&b.dir_name)));
    Ok(entries)
}

/// `0` for an empty state directory, otherwise one past the highest number.
///
/// The result may exceed [`MAX_SEQUENCE`]; callers that create directories
/// must check it.
pub fn next_sequence_number(state_dir: &Path) -> Result<u32> {
    let next = scan(state_dir)?
        .iter()
        .map(|e| e.number)
        .max()
        .map_or(0, |max| max + 1);
    tracing::debug!(state_dir = %state_dir.display(), next, "computed next sequence number");
    Ok(next)
}

/// Find the task directory whose name, with the `NN_` prefix stripped, equals
/// `task_name` exactly.
pub fn resolve_task_directory(state_dir: &Path, task_name: &str) -> Result<TaskDirEntry> {
    if !state_dir.is_dir() {
        return Err(FlowError::StateDirMissing(
            state_dir
                .parent()
                .unwrap_or(state_dir)
                .display()
                .to_string(),
        ));
    }

    let mut matches: Vec<TaskDirEntry> = scan(state_dir)?
        .into_iter()
        .filter(|e| e.name == task_name)
        .collect();

    match matches.len() {
        0 => Err(FlowError::TaskNotFound(task_name.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(FlowError::AmbiguousTask {
            name: task_name.to_string(),
            candidates: matches.into_iter().map(|e| e.dir_name).collect(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mkdirs(dir: &Path, names: &[&str]) {
        for n in names {
            std::fs::create_dir_all(dir.join(n)).unwrap();
        }
    }

    #[test]
    fn missing_state_dir_starts_at_zero() {
        let dir = TempDir::new().unwrap();
        assert_eq!(next_sequence_number(&dir.path().join(".flow")).unwrap(), 0);
    }

    #[test]
    fn empty_state_dir_starts_at_zero() {
        let dir = TempDir::new().unwrap();
        assert_eq!(next_sequence_number(dir.path()).unwrap(), 0);
    }

    #[test]
    fn next_is_one_past_max_with_gaps_and_noise() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), &["00_a", "01_b", "05_c", "abc", "100_x", ".git", "7_short"]);
        std::fs::write(dir.path().join("09_file_not_dir"), "x").unwrap();
        std::fs::write(dir.path().join("PROJECT_CONTEXT.md"), "x").unwrap();
        assert_eq!(next_sequence_number(dir.path()).unwrap(), 6);
    }

    #[test]
    fn non_matching_dirs_are_invisible() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), &["abc", "100_x", ".git"]);
        assert!(scan(dir.path()).unwrap().is_empty());
        assert_eq!(next_sequence_number(dir.path()).unwrap(), 0);
        assert!(matches!(
            resolve_task_directory(dir.path(), "x"),
            Err(FlowError::TaskNotFound(_))
        ));
    }

    #[test]
    fn next_can_exceed_two_digits() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), &["99_last"]);
        assert_eq!(next_sequence_number(dir.path()).unwrap(), 100);
    }

    #[test]
    fn scan_orders_numerically() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), &["10_z", "02_y", "00_x"]);
        let names: Vec<String> = scan(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.dir_name)
            .collect();
        assert_eq!(names, vec!["00_x", "02_y", "10_z"]);
    }

    #[test]
    fn resolve_uses_exact_name_not_suffix() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), &["00_auth", "01_oauth"]);
        let entry = resolve_task_directory(dir.path(), "auth").unwrap();
        assert_eq!(entry.dir_name, "00_auth");
        assert_eq!(entry.number, 0);

        let entry = resolve_task_directory(dir.path(), "oauth").unwrap();
        assert_eq!(entry.dir_name, "01_oauth");
    }

    #[test]
    fn resolve_names_with_underscores() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), &["03_FEATURE_AUTH"]);
        let entry = resolve_task_directory(dir.path(), "FEATURE_AUTH").unwrap();
        assert_eq!(entry.number, 3);
        assert!(resolve_task_directory(dir.path(), "AUTH").is_err());
    }

    #[test]
    fn resolve_duplicate_names_is_ambiguous() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), &["00_auth", "03_auth"]);
        match resolve_task_directory(dir.path(), "auth") {
            Err(FlowError::AmbiguousTask { candidates, .. }) => {
                assert_eq!(candidates, vec!["00_auth", "03_auth"]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn resolve_without_state_dir_reports_missing() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            resolve_task_directory(&dir.path().join(".flow"), "x"),
            Err(FlowError::StateDirMissing(_))
        ));
    }

    #[test]
    fn parse_rejects_non_task_names() {
        assert_eq!(parse_task_dir_name("07_login"), Some((7, "login")));
        assert_eq!(parse_task_dir_name("00_"), Some((0, "")));
        assert_eq!(parse_task_dir_name("100_x"), None);
        assert_eq!(parse_task_dir_name("1_x"), None);
        assert_eq!(parse_task_dir_name("ab_x"), None);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_task_directory_keeps_its_number() {
        let dir = TempDir::new().unwrap();
        let state = dir.path().join(".flow");
        let target = dir.path().join("elsewhere");
        std::fs::create_dir_all(&state).unwrap();
        std::fs::create_dir_all(&target).unwrap();
        std::os::unix::fs::symlink(&target, state.join("00_linked")).unwrap();

        assert_eq!(next_sequence_number(&state).unwrap(), 1);
        assert_eq!(resolve_task_directory(&state, "linked").unwrap().dir_name, "00_linked");
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_not_a_task() {
        let dir = TempDir::new().unwrap();
        let state = dir.path().join(".flow");
        std::fs::create_dir_all(&state).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), state.join("04_gone")).unwrap();
        assert_eq!(next_sequence_number(&state).unwrap(), 0);
    }
}
