use crate::output::print_json;
use crate::render;
use flow_core::scan;
use std::path::Path;

pub fn run(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let info = scan::task_info(root, name)?;
    if json {
        print_json(&info)?;
    } else {
        println!("{}", render::task_info(&info).trim_end());
    }
    Ok(())
}
