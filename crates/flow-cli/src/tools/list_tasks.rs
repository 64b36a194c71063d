use super::{working_dir, working_directory_schema, ToolInfo};
use crate::render;
use flow_core::{paths, scan};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

pub const NAME: &str = "list_tasks";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "List all tasks in the project with number, type and completion status",
    schema,
};

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "workingDirectory": working_directory_schema()
        }
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Args {
    pub working_directory: Option<String>,
}

pub fn run(args: Args, root: &Path) -> flow_core::Result<String> {
    let dir = working_dir(root, &args.working_directory);
    let tasks = scan::list_tasks(&dir)?;
    Ok(render::task_list(&tasks, paths::state_dir(&dir).is_dir()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_in_numeric_order_with_status() {
        let dir = TempDir::new().unwrap();
        let flow = dir.path().join(".flow");
        std::fs::create_dir_all(flow.join("01_second")).unwrap();
        std::fs::create_dir_all(flow.join("00_first")).unwrap();
        std::fs::create_dir_all(flow.join("notes")).unwrap();
        std::fs::write(flow.join("00_first/COMPLETION_REPORT.md"), "# done").unwrap();
        std::fs::write(flow.join("01_second/BUSINESS_CONTEXT.md"), "a bug").unwrap();

        let text = run(Args::default(), dir.path()).unwrap();
        let first = text.find("00 📝 first ✅ Complete").unwrap();
        let second = text.find("01 🐛 second 🔄 In Progress").unwrap();
        assert!(first < second);
        assert!(text.ends_with("Total: 2 task(s)"));
    }

    #[test]
    fn empty_state_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".flow")).unwrap();
        let text = run(Args::default(), dir.path()).unwrap();
        assert!(text.contains("No tasks found"));
    }
}
