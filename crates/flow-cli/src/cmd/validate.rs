use crate::output::print_json;
use crate::render;
use flow_core::validate;
use std::path::Path;

/// Exits non-zero when any artifact has findings.
pub fn run(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let report = validate::validate_task(root, name)?;

    if json {
        print_json(&report)?;
    } else {
        println!("{}", render::validation(&report));
    }

    if !report.is_valid() {
        anyhow::bail!(
            "task '{}' has {} validation issue(s)",
            report.task.dir_name,
            report.issue_count()
        );
    }
    Ok(())
}
