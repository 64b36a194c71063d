use super::{save_document, string_list_schema, working_dir, working_directory_schema, ToolInfo};
use flow_core::generate::{self, BusinessContextRequest};
use flow_core::paths::BUSINESS_CONTEXT_MD;
use flow_core::config::Config;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

pub const NAME: &str = "generate_business_context";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "Generate BUSINESS_CONTEXT.md content (user story, Gherkin scenarios, acceptance criteria) from a task description",
    schema,
};

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "taskName": { "type": "string", "description": "Name of the task" },
            "description": {
                "type": "string",
                "description": "What needs to be built or fixed"
            },
            "userStory": {
                "type": "string",
                "description": "User story: As a [user], I want [goal], So that [benefit]"
            },
            "acceptanceCriteria": string_list_schema("Acceptance criteria, one per item"),
            "taskType": {
                "type": "string",
                "enum": ["feature", "bug", "improvement", "research"],
                "description": "Type of task (defaults to feature)"
            },
            "save": {
                "type": "boolean",
                "description": "Write the document into the task's directory"
            },
            "workingDirectory": working_directory_schema()
        },
        "required": ["taskName", "description"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Args {
    pub task_name: String,
    pub description: String,
    pub user_story: Option<String>,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    pub task_type: Option<String>,
    #[serde(default)]
    pub save: bool,
    pub working_directory: Option<String>,
}

pub fn run(args: Args, root: &Path) -> flow_core::Result<String> {
    let dir = working_dir(root, &args.working_directory);
    let task_type = Config::load(&dir)?.resolve_task_type(args.task_type.as_deref());
    let document = generate::business_context(&BusinessContextRequest {
        task_name: &args.task_name,
        description: &args.description,
        user_story: args.user_story.as_deref(),
        acceptance_criteria: &args.acceptance_criteria,
        task_type,
    });
    if args.save {
        return save_document(&dir, &args.task_name, BUSINESS_CONTEXT_MD, document);
    }
    Ok(document)
}
