use super::{working_dir, working_directory_schema, ToolInfo};
use crate::render;
use flow_core::scan;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

pub const NAME: &str = "get_project_status";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "Summarize the project: task counts by completion state and by type",
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
    let status = scan::project_status(&dir)?;
    Ok(render::project_status(&status))
}
