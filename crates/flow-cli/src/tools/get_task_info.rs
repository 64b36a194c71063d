use super::{working_dir, working_directory_schema, ToolInfo};
use crate::render;
use flow_core::scan;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

pub const NAME: &str = "get_task_info";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "Show a task's number, type, status and the first lines of each of its documents",
    schema,
};

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "taskName": {
                "type": "string",
                "description": "Name of the task (without the NN_ prefix)"
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

pub fn run(args: Args, root: &Path) -> flow_core::Result<String> {
    let dir = working_dir(root, &args.working_directory);
    let info = scan::task_info(&dir, &args.task_name)?;
    Ok(render::task_info(&info))
}
