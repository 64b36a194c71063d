use crate::output::print_json;
use crate::render;
use anyhow::Context;
use flow_core::scan;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let status = scan::project_status(root).context("failed to read project status")?;
    if json {
        print_json(&status)?;
    } else {
        println!("{}", render::project_status(&status).trim_end());
    }
    Ok(())
}
