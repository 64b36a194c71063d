use crate::output::print_json;
use crate::render;
use anyhow::Context;
use flow_core::analyze::{self, AnalyzeOptions};
use std::path::Path;

pub fn run(
    root: &Path,
    path: Option<&Path>,
    exclude: &[String],
    depth: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let target = match path {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => root.join(p),
        None => root.to_path_buf(),
    };
    let mut opts = AnalyzeOptions::default().exclude_patterns(exclude);
    if let Some(depth) = depth {
        opts.max_depth = depth;
    }

    let analysis = analyze::analyze(&target, &opts)
        .with_context(|| format!("failed to analyze {}", target.display()))?;

    if json {
        print_json(&analysis)?;
    } else {
        println!("{}", render::analysis(&analysis).trim_end());
    }
    Ok(())
}
