use super::{working_dir, working_directory_schema, ToolInfo};
use crate::render;
use flow_core::validate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

pub const NAME: &str = "validate_task";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "Check a task's documents: present, non-empty, no leftover {{PLACEHOLDERS}}, Given/When/Then scenarios in the business context and at least three sections in the approach",
    schema,
};

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "taskName": {
                "type": "string",
                "description": "Name of the task to validate (without the NN_ prefix)"
            },
            "workingDirectory": working_directory_schema()
        },
        "required": ["taskName"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Args {
    pub task_name: String,
    pub working_directory: Option<String>,
}

/// Findings are part of a successful result; only lookup and I/O problems
/// are errors.
pub fn run(args: Args, root: &Path) -> flow_core::Result<String> {
    let dir = working_dir(root, &args.working_directory);
    let report = validate::validate_task(&dir, &args.task_name)?;
    Ok(render::validation(&report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(name: &str) -> Args {
        Args {
            task_name: name.to_string(),
            working_directory: None,
        }
    }

    #[test]
    fn reports_each_artifact() {
        let dir = TempDir::new().unwrap();
        let task = dir.path().join(".flow/00_auth");
        std::fs::create_dir_all(&task).unwrap();
        std::fs::write(task.join("APPROACH.md"), "## One\n## Two\n").unwrap();

        let text = run(args("auth"), dir.path()).unwrap();
        assert!(text.contains("❌ Issues BUSINESS_CONTEXT.md"));
        assert!(text.contains("└─ File does not exist"));
        assert!(text.contains("Insufficient structure"));
        assert!(text.ends_with("❌ Task structure has issues that need to be fixed."));
    }

    #[test]
    fn not_found_is_an_error_with_hint() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".flow/01_oauth")).unwrap();
        let err = run(args("auth"), dir.path()).unwrap_err();
        assert_eq!(err.kind(), flow_core::ErrorKind::NotFound);
        assert!(err.to_string().contains("list tasks"));
    }
}
