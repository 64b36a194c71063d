use crate::root::resolve_working_dir;
use flow_core::{numbering, paths, FlowError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub mod analyze_codebase;
pub mod check_agents_update;
pub mod create_task;
pub mod generate_approach;
pub mod generate_business_context;
pub mod generate_completion_report;
pub mod get_project_status;
pub mod get_task_info;
pub mod init_flow_project;
pub mod list_tasks;
pub mod update_agents_template;
pub mod update_project_context;
pub mod validate_task;

/// What `tools/list` advertises for one tool.
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub schema: fn() -> Value,
}

pub fn all_tools() -> Vec<ToolInfo> {
    vec![
        create_task::INFO,
        list_tasks::INFO,
        validate_task::INFO,
        get_task_info::INFO,
        get_project_status::INFO,
        generate_business_context::INFO,
        generate_approach::INFO,
        generate_completion_report::INFO,
        analyze_codebase::INFO,
        update_project_context::INFO,
        init_flow_project::INFO,
        check_agents_update::INFO,
        update_agents_template::INFO,
    ]
}

// ---------------------------------------------------------------------------
// Typed calls
// ---------------------------------------------------------------------------

/// A tool invocation with its arguments already decoded and checked.
#[derive(Debug)]
pub enum ToolCall {
    CreateTask(create_task::Args),
    ListTasks(list_tasks::Args),
    ValidateTask(validate_task::Args),
    GetTaskInfo(get_task_info::Args),
    GetProjectStatus(get_project_status::Args),
    GenerateBusinessContext(generate_business_context::Args),
    GenerateApproach(generate_approach::Args),
    GenerateCompletionReport(generate_completion_report::Args),
    AnalyzeCodebase(analyze_codebase::Args),
    UpdateProjectContext(update_project_context::Args),
    InitFlowProject(init_flow_project::Args),
    CheckAgentsUpdate(check_agents_update::Args),
    UpdateAgentsTemplate(update_agents_template::Args),
}

impl ToolCall {
    /// Decode the argument object for tool `name`. `Ok(None)` means no tool
    /// by that name exists.
    pub fn parse(name: &str, args: Value) -> Result<Option<Self>, FlowError> {
        let call = match name {
            create_task::NAME => ToolCall::CreateTask(decode(args)?),
            list_tasks::NAME => ToolCall::ListTasks(decode(args)?),
            validate_task::NAME => ToolCall::ValidateTask(decode(args)?),
            get_task_info::NAME => ToolCall::GetTaskInfo(decode(args)?),
            get_project_status::NAME => ToolCall::GetProjectStatus(decode(args)?),
            generate_business_context::NAME => ToolCall::GenerateBusinessContext(decode(args)?),
            generate_approach::NAME => ToolCall::GenerateApproach(decode(args)?),
            generate_completion_report::NAME => ToolCall::GenerateCompletionReport(decode(args)?),
            analyze_codebase::NAME => ToolCall::AnalyzeCodebase(decode(args)?),
            update_project_context::NAME => ToolCall::UpdateProjectContext(decode(args)?),
            init_flow_project::NAME => ToolCall::InitFlowProject(decode(args)?),
            check_agents_update::NAME => ToolCall::CheckAgentsUpdate(decode(args)?),
            update_agents_template::NAME => ToolCall::UpdateAgentsTemplate(decode(args)?),
            _ => return Ok(None),
        };
        Ok(Some(call))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::CreateTask(_) => create_task::NAME,
            ToolCall::ListTasks(_) => list_tasks::NAME,
            ToolCall::ValidateTask(_) => validate_task::NAME,
            ToolCall::GetTaskInfo(_) => get_task_info::NAME,
            ToolCall::GetProjectStatus(_) => get_project_status::NAME,
            ToolCall::GenerateBusinessContext(_) => generate_business_context::NAME,
            ToolCall::GenerateApproach(_) => generate_approach::NAME,
            ToolCall::GenerateCompletionReport(_) => generate_completion_report::NAME,
            ToolCall::AnalyzeCodebase(_) => analyze_codebase::NAME,
            ToolCall::UpdateProjectContext(_) => update_project_context::NAME,
            ToolCall::InitFlowProject(_) => init_flow_project::NAME,
            ToolCall::CheckAgentsUpdate(_) => check_agents_update::NAME,
            ToolCall::UpdateAgentsTemplate(_) => update_agents_template::NAME,
        }
    }
}

/// Run a decoded call against the server root and return the text result.
pub fn dispatch(call: ToolCall, root: &Path) -> Result<String, FlowError> {
    tracing::info!(tool = call.name(), "tool call");
    match call {
        ToolCall::CreateTask(a) => create_task::run(a, root),
        ToolCall::ListTasks(a) => list_tasks::run(a, root),
        ToolCall::ValidateTask(a) => validate_task::run(a, root),
        ToolCall::GetTaskInfo(a) => get_task_info::run(a, root),
        ToolCall::GetProjectStatus(a) => get_project_status::run(a, root),
        ToolCall::GenerateBusinessContext(a) => generate_business_context::run(a, root),
        ToolCall::GenerateApproach(a) => generate_approach::run(a, root),
        ToolCall::GenerateCompletionReport(a) => generate_completion_report::run(a, root),
        ToolCall::AnalyzeCodebase(a) => analyze_codebase::run(a, root),
        ToolCall::UpdateProjectContext(a) => update_project_context::run(a, root),
        ToolCall::InitFlowProject(a) => init_flow_project::run(a, root),
        ToolCall::CheckAgentsUpdate(a) => check_agents_update::run(a, root),
        ToolCall::UpdateAgentsTemplate(a) => update_agents_template::run(a, root),
    }
}

// ---------------------------------------------------------------------------
// Helpers shared by the tool modules
// ---------------------------------------------------------------------------

/// Absent arguments decode like an empty object.
fn decode<T: DeserializeOwned>(args: Value) -> Result<T, FlowError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| FlowError::InvalidArguments(e.to_string()))
}

pub(crate) fn working_dir(root: &Path, working_directory: &Option<String>) -> PathBuf {
    resolve_working_dir(root, working_directory.as_deref())
}

pub(crate) fn working_directory_schema() -> Value {
    serde_json::json!({
        "type": "string",
        "description": "Project directory to operate in (defaults to the server root; relative paths are resolved against it)"
    })
}

pub(crate) fn string_list_schema(description: &str) -> Value {
    serde_json::json!({
        "type": "array",
        "items": { "type": "string" },
        "description": description
    })
}

/// Write a generated document into the task's directory and prefix the
/// result text with where it went.
pub(crate) fn save_document(
    dir: &Path,
    task_name: &str,
    file: &str,
    document: String,
) -> Result<String, FlowError> {
    let entry = numbering::resolve_task_directory(&paths::state_dir(dir), task_name)?;
    let path = entry.path.join(file);
    flow_core::io::atomic_write(&path, document.as_bytes())?;
    tracing::info!(path = %path.display(), "generated document saved");
    Ok(format!("💾 Saved to {}\n\n{document}", path.display()))
}
