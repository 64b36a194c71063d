use super::{string_list_schema, working_dir, working_directory_schema, ToolInfo};
use crate::render;
use flow_core::analyze::{self, AnalyzeOptions};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

pub const NAME: &str = "analyze_codebase";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "Analyze a codebase: project manifests and dependencies, directory tree, configuration files and file counts by extension",
    schema,
};

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "path": {
                "type": "string",
                "description": "Path to analyze, relative to the working directory (defaults to \".\")"
            },
            "excludePatterns": string_list_schema(
                "Directories to skip, e.g. \"dist/**\" (node_modules, target, dist, build and .git are always skipped)"
            ),
            "maxDepth": {
                "type": "integer",
                "description": "Depth of the directory tree (defaults to 3)"
            },
            "workingDirectory": working_directory_schema()
        }
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Args {
    pub path: Option<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    pub max_depth: Option<usize>,
    pub working_directory: Option<String>,
}

pub fn run(args: Args, root: &Path) -> flow_core::Result<String> {
    let base = working_dir(root, &args.working_directory);
    let target = match args.path.as_deref() {
        Some(p) if !p.trim().is_empty() => base.join(p.trim()),
        _ => base,
    };
    let mut opts = AnalyzeOptions::default().exclude_patterns(&args.exclude_patterns);
    if let Some(depth) = args.max_depth {
        opts.max_depth = depth;
    }
    let analysis = analyze::analyze(&target, &opts)?;
    Ok(render::analysis(&analysis))
}
