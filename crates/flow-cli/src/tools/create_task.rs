use super::{working_dir, working_directory_schema, ToolInfo};
use crate::render;
use flow_core::config::Config;
use flow_core::writer::{self, CreateTaskRequest};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

pub const NAME: &str = "create_task";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "Create a numbered task directory (.flow/NN_<name>) holding business context, approach and completion report documents",
    schema,
};

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "taskName": {
                "type": "string",
                "description": "Name of the task (e.g. task-1234, FEATURE_AUTH); becomes the directory suffix"
            },
            "taskType": {
                "type": "string",
                "enum": ["feature", "bug", "improvement", "research"],
                "description": "Type of task; unrecognized values fall back to the project default"
            },
            "workingDirectory": working_directory_schema(),
            "description": {
                "type": "string",
                "description": "Short summary of the task, used in the generated documents"
            },
            "autoGenerate": {
                "type": "boolean",
                "description": "Synthesize the documents from the description instead of filling the static templates"
            }
        },
        "required": ["taskName"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Args {
    pub task_name: String,
    pub task_type: Option<String>,
    pub working_directory: Option<String>,
    pub description: Option<String>,
    pub auto_generate: Option<bool>,
}

pub fn run(args: Args, root: &Path) -> flow_core::Result<String> {
    let dir = working_dir(root, &args.working_directory);
    let cfg = Config::load(&dir)?;
    let req = CreateTaskRequest::from_options(
        &cfg,
        &args.task_name,
        args.task_type.as_deref(),
        args.description.as_deref(),
        args.auto_generate,
    );
    let created = writer::create_task(&dir, &req)?;
    Ok(render::created_task(&created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(name: &str, task_type: Option<&str>) -> Args {
        Args {
            task_name: name.to_string(),
            task_type: task_type.map(str::to_string),
            working_directory: None,
            description: None,
            auto_generate: None,
        }
    }

    #[test]
    fn creates_numbered_directory() {
        let dir = TempDir::new().unwrap();
        let text = run(args("login", Some("bug")), dir.path()).unwrap();
        assert!(text.contains("Task \"login\" created successfully"));
        assert!(text.contains("Type: bug"));
        assert!(dir.path().join(".flow/00_login/BUSINESS_CONTEXT.md").exists());

        run(args("signup", None), dir.path()).unwrap();
        assert!(dir.path().join(".flow/01_signup/APPROACH.md").exists());
    }

    #[test]
    fn unknown_type_falls_back_to_feature() {
        let dir = TempDir::new().unwrap();
        let text = run(args("x", Some("epic")), dir.path()).unwrap();
        assert!(text.contains("Type: feature"));
    }

    #[test]
    fn relative_working_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("app")).unwrap();
        let mut a = args("x", None);
        a.working_directory = Some("app".into());
        run(a, dir.path()).unwrap();
        assert!(dir.path().join("app/.flow/00_x").is_dir());
        assert!(!dir.path().join(".flow").exists());
    }

    #[test]
    fn auto_generate_uses_description() {
        let dir = TempDir::new().unwrap();
        let mut a = args("cache", Some("research"));
        a.description = Some("Compare eviction policies".into());
        a.auto_generate = Some(true);
        run(a, dir.path()).unwrap();
        let bc = std::fs::read_to_string(dir.path().join(".flow/00_cache/BUSINESS_CONTEXT.md")).unwrap();
        assert!(bc.contains("Compare eviction policies"));
    }

    #[test]
    fn invalid_name_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = run(args("a/b", None), dir.path()).unwrap_err();
        assert_eq!(err.kind(), flow_core::ErrorKind::InvalidInput);
    }
}
