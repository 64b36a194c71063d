use super::update_project_context::context_properties;
use super::{working_dir, ToolInfo};
use crate::render;
use flow_core::project::{self, ProjectContextInput};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

pub const NAME: &str = "init_flow_project";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "Initialize a Flow project: .flow directory, PROJECT_CONTEXT.md, config.yaml and AGENTS.md. Existing files are kept",
    schema,
};

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
    let report = project::init_project(&dir, &args.context)?;
    Ok(render::init_report(&report))
}
