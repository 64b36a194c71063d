use super::{save_document, string_list_schema, working_dir, working_directory_schema, ToolInfo};
use flow_core::generate::{self, ApproachRequest};
use flow_core::paths::APPROACH_MD;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

pub const NAME: &str = "generate_approach";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "Generate APPROACH.md content from a business context; the task type is read from the business context",
    schema,
};

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "taskName": { "type": "string", "description": "Name of the task" },
            "businessContext": {
                "type": "string",
                "description": "Business context document the approach is based on"
            },
            "techStack": string_list_schema("Technologies used in the project"),
            "architecture": {
                "type": "string",
                "description": "Current architecture description"
            },
            "save": {
                "type": "boolean",
                "description": "Write the document into the task's directory"
            },
            "workingDirectory": working_directory_schema()
        },
        "required": ["taskName", "businessContext"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Args {
    pub task_name: String,
    pub business_context: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub architecture: Option<String>,
    #[serde(default)]
    pub save: bool,
    pub working_directory: Option<String>,
}

pub fn run(args: Args, root: &Path) -> flow_core::Result<String> {
    let document = generate::approach(&ApproachRequest {
        task_name: &args.task_name,
        business_context: &args.business_context,
        tech_stack: &args.tech_stack,
        architecture: args.architecture.as_deref(),
        task_type: None,
    });
    if args.save {
        let dir = working_dir(root, &args.working_directory);
        return save_document(&dir, &args.task_name, APPROACH_MD, document);
    }
    Ok(document)
}
