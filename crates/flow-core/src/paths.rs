use crate::error::{FlowError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const STATE_DIR: &str = ".flow";
pub const CONFIG_FILE: &str = ".flow/config.yaml";
pub const PROJECT_CONTEXT_FILE: &str = ".flow/PROJECT_CONTEXT.md";

pub const AGENTS_MD: &str = "AGENTS.md";

pub const BUSINESS_CONTEXT_MD: &str = "BUSINESS_CONTEXT.md";
pub const APPROACH_MD: &str = "APPROACH.md";
pub const COMPLETION_REPORT_MD: &str = "COMPLETION_REPORT.md";
pub const TASK_MANIFEST: &str = "task.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn state_dir(root: &Path) -> PathBuf {
    root.join(STATE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn project_context_path(root: &Path) -> PathBuf {
    root.join(PROJECT_CONTEXT_FILE)
}

/// `AGENTS.md` in the project root.
pub fn agents_md_root_path(root: &Path) -> PathBuf {
    root.join(AGENTS_MD)
}

/// `AGENTS.md` inside the state directory.
pub fn agents_md_state_path(root: &Path) -> PathBuf {
    state_dir(root).join(AGENTS_MD)
}

pub fn task_manifest(task_dir: &Path) -> PathBuf {
    task_dir.join(TASK_MANIFEST)
}

/// Directory name for a task: zero-padded two-digit number, underscore, name.
pub fn task_dir_name(number: u32, name: &str) -> String {
    format!("{number:02}_{name}")
}

// ---------------------------------------------------------------------------
// Task name validation
// ---------------------------------------------------------------------------

const MAX_TASK_NAME_LEN: usize = 100;
const RESERVED_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// Reject names that cannot safely become a single directory-name component.
pub fn validate_task_name(name: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(FlowError::InvalidTaskName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return reject("name is empty");
    }
    if name == "." || name == ".." {
        return reject("name cannot be '.' or '..'");
    }
    if name.len() > MAX_TASK_NAME_LEN {
        return reject("name is longer than 100 bytes");
    }
    if let Some(c) = name.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return reject(&format!("contains reserved character '{c}'"));
    }
    if name.chars().any(char::is_control) {
        return reject("contains control characters");
    }
    if name.trim() != name {
        return reject("has leading or trailing whitespace");
    }
    // The name is substituted into the artifacts; braces would read back as
    // an unresolved placeholder.
    if name.contains("{{") || name.contains("}}") {
        return reject("contains '{{' or '}}'");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_task_names() {
        for name in ["login", "task-1234", "FEATURE_AUTH", "fix login bug", "ação", "set {x}"] {
            validate_task_name(name).unwrap_or_else(|_| panic!("expected valid: {name}"));
        }
    }

    #[test]
    fn invalid_task_names() {
        let long = "x".repeat(101);
        for name in [
            "", "   ", ".", "..", "a/b", "a\\b", "what?", "a\0b", "tab\there", "login ", " login",
            "{{WIP}}", "a}}b", &long,
        ] {
            assert!(validate_task_name(name).is_err(), "expected invalid: {name:?}");
        }
    }

    #[test]
    fn dir_name_is_zero_padded() {
        assert_eq!(task_dir_name(0, "login"), "00_login");
        assert_eq!(task_dir_name(7, "auth"), "07_auth");
        assert_eq!(task_dir_name(42, "x"), "42_x");
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(config_path(root), PathBuf::from("/tmp/proj/.flow/config.yaml"));
        assert_eq!(
            project_context_path(root),
            PathBuf::from("/tmp/proj/.flow/PROJECT_CONTEXT.md")
        );
        assert_eq!(
            task_manifest(&state_dir(root).join("00_login")),
            PathBuf::from("/tmp/proj/.flow/00_login/task.yaml")
        );
    }
}
