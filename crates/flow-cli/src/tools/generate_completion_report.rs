use super::{save_document, string_list_schema, working_dir, working_directory_schema, ToolInfo};
use flow_core::generate::{self, CompletionReportRequest, ReportMetrics};
use flow_core::paths::COMPLETION_REPORT_MD;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

pub const NAME: &str = "generate_completion_report";

pub const INFO: ToolInfo = ToolInfo {
    name: NAME,
    description: "Generate COMPLETION_REPORT.md content from the work done, issues found, deviations and metrics",
    schema,
};

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "taskName": { "type": "string", "description": "Name of the task" },
            "workDone": string_list_schema("Work items completed"),
            "issuesFound": string_list_schema("Issues or bugs found during implementation"),
            "deviations": string_list_schema("Deviations from the original plan"),
            "metrics": {
                "type": "object",
                "properties": {
                    "duration": { "type": "string" },
                    "filesChanged": { "type": "number" },
                    "linesAdded": { "type": "number" },
                    "linesRemoved": { "type": "number" },
                    "testCoverage": { "type": "number" }
                },
                "description": "Optional delivery metrics"
            },
            "save": {
                "type": "boolean",
                "description": "Write the document into the task's directory"
            },
            "workingDirectory": working_directory_schema()
        },
        "required": ["taskName", "workDone"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Args {
    pub task_name: String,
    pub work_done: Vec<String>,
    #[serde(default)]
    pub issues_found: Vec<String>,
    #[serde(default)]
    pub deviations: Vec<String>,
    #[serde(default)]
    pub metrics: ReportMetrics,
    #[serde(default)]
    pub save: bool,
    pub working_directory: Option<String>,
}

pub fn run(args: Args, root: &Path) -> flow_core::Result<String> {
    let document = generate::completion_report(&CompletionReportRequest {
        task_name: &args.task_name,
        work_done: &args.work_done,
        issues_found: &args.issues_found,
        deviations: &args.deviations,
        metrics: &args.metrics,
    });
    if args.save {
        let dir = working_dir(root, &args.working_directory);
        return save_document(&dir, &args.task_name, COMPLETION_REPORT_MD, document);
    }
    Ok(document)
}
