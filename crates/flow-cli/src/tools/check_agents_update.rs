use super::{working_dir, working_directory_schema, ToolInfo};
use crate::render;
use flow_core::agents;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

pub const NAME: &str = "check_agents_update";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "Check whether AGENTS.md exists and whether its Flow section matches the current template",
    schema,
};

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "showDetails": {
                "type": "boolean",
                "description": "Include the current and template sections in the output"
            },
            "workingDirectory": working_directory_schema()
        }
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Args {
    #[serde(default)]
    pub show_details: bool,
    pub working_directory: Option<String>,
}

pub fn run(args: Args, root: &Path) -> flow_core::Result<String> {
    let dir = working_dir(root, &args.working_directory);
    let check = agents::check_agents(&dir)?;
    Ok(render::agents_check(&check, args.show_details))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_then_unmanaged() {
        let dir = TempDir::new().unwrap();
        let text = run(Args::default(), dir.path()).unwrap();
        assert!(text.contains("AGENTS.md does not exist"));
        assert!(text.contains("update_agents_template"));

        std::fs::write(dir.path().join("AGENTS.md"), "# Team notes\n").unwrap();
        let text = run(
            Args {
                show_details: true,
                working_directory: None,
            },
            dir.path(),
        )
        .unwrap();
        assert!(text.contains("no Flow section"));
        assert!(text.contains("--- template section ---"));
    }
}
