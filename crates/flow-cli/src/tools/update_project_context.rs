use super::{string_list_schema, working_dir, working_directory_schema, ToolInfo};
use flow_core::project::{self, ProjectContextInput};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::path::Path;

pub const NAME: &str = "update_project_context";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "Rewrite .flow/PROJECT_CONTEXT.md from structured project information, creating it if it does not exist",
    schema,
};

/// Properties shared with `init_flow_project`.
pub(crate) fn context_properties() -> Map<String, Value> {
    let tech_entry = json!({
        "type": "object",
        "properties": {
            "category": { "type": "string" },
            "technology": { "type": "string" },
            "version": { "type": "string" },
            "justification": { "type": "string" }
        },
        "required": ["category", "technology"]
    });
    let props = json!({
        "projectName": { "type": "string", "description": "Name of the project" },
        "mission": { "type": "string", "description": "Mission statement" },
        "goals": string_list_schema("Long-term goals"),
        "techStack": {
            "type": "array",
            "items": tech_entry,
            "description": "Technology stack"
        },
        "architecture": {
            "type": "object",
            "properties": {
                "principles": string_list_schema("Architectural principles"),
                "patterns": { "type": "object", "description": "Pattern name to description" },
                "guidelines": string_list_schema("Design guidelines")
            },
            "description": "Architectural principles and patterns"
        },
        "standards": {
            "type": "object",
            "properties": {
                "coding": string_list_schema("Coding standards"),
                "quality": string_list_schema("Quality gates"),
                "git": string_list_schema("Git workflow")
            },
            "description": "Development standards"
        },
        "tools": {
            "type": "object",
            "properties": {
                "development": string_list_schema("Development tools"),
                "monitoring": string_list_schema("Monitoring tools"),
                "ci_cd": string_list_schema("CI/CD tools")
            },
            "description": "Tools and configurations"
        },
        "metrics": {
            "type": "object",
            "properties": {
                "technical": { "type": "object" },
                "business": { "type": "object" }
            },
            "description": "Success metrics, name to target"
        },
        "notes": { "type": "string", "description": "Additional notes" },
        "workingDirectory": working_directory_schema()
    });
    match props {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": context_properties()
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Args {
    #[serde(flatten)]
    pub context: ProjectContextInput,
    pub working_directory: Option<String>,
}

pub fn run(args: Args, root: &Path) -> flow_core::Result<String> {
    let dir = working_dir(root, &args.working_directory);
    let update = project::update_project_context(&dir, &args.context)?;
    let verb = update.file.status.as_str();
    let mut text = format!("✅ PROJECT_CONTEXT.md {verb}: {}", update.file.path.display());
    if update.sections.is_empty() {
        text.push_str("\nℹ️ No sections provided; defaults were written");
    } else {
        text.push_str(&format!("\n📝 Sections provided: {}", update.sections.join(", ")));
    }
    Ok(text)
}
