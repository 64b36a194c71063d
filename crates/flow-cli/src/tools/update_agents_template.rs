use super::{working_dir, working_directory_schema, ToolInfo};
use crate::render;
use flow_core::agents::{self, AgentsUpdateOptions};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

pub const NAME: &str = "update_agents_template";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "Refresh the Flow section of AGENTS.md from the current template, keeping content outside the section",
    schema,
};

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "forceUpdate": {
                "type": "boolean",
                "description": "Rewrite even when up to date; replace the whole file when it has no Flow section"
            },
            "preserveCustomizations": {
                "type": "boolean",
                "description": "Keep content outside the Flow section (default true)"
            },
            "backupOriginal": {
                "type": "boolean",
                "description": "Copy the file to AGENTS.md.bak before changing it (default true)"
            },
            "workingDirectory": working_directory_schema()
        }
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Args {
    #[serde(default)]
    pub force_update: bool,
    pub preserve_customizations: Option<bool>,
    pub backup_original: Option<bool>,
    pub working_directory: Option<String>,
}

impl Args {
    fn options(&self) -> AgentsUpdateOptions {
        let defaults = AgentsUpdateOptions::default();
        AgentsUpdateOptions {
            force: self.force_update,
            backup: self.backup_original.unwrap_or(defaults.backup),
            preserve_customizations: self
                .preserve_customizations
                .unwrap_or(defaults.preserve_customizations),
        }
    }
}

pub fn run(args: Args, root: &Path) -> flow_core::Result<String> {
    let dir = working_dir(root, &args.working_directory);
    let update = agents::update_agents(&dir, args.options())?;
    Ok(render::agents_update(&update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_section_and_backs_up() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("AGENTS.md"), "# Team notes\n").unwrap();

        let text = run(Args::default(), dir.path()).unwrap();
        assert!(text.contains("AGENTS.md appended"));
        assert!(text.contains("Backup:"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("AGENTS.md.bak")).unwrap(),
            "# Team notes\n"
        );
        let updated = std::fs::read_to_string(dir.path().join("AGENTS.md")).unwrap();
        assert!(updated.starts_with("# Team notes\n"));

        let again = run(Args::default(), dir.path()).unwrap();
        assert!(again.contains("unchanged"));
    }

    #[test]
    fn without_preserving_customizations_rewrites() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("AGENTS.md"), "# Team notes\n").unwrap();
        let text = run(
            Args {
                preserve_customizations: Some(false),
                backup_original: Some(false),
                ..Args::default()
            },
            dir.path(),
        )
        .unwrap();
        assert!(text.contains("rewritten"));
        assert!(!dir.path().join("AGENTS.md.bak").exists());
        let updated = std::fs::read_to_string(dir.path().join("AGENTS.md")).unwrap();
        assert!(!updated.contains("# Team notes"));
    }
}
