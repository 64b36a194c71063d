use crate::tools::{self, ToolCall, ToolInfo};
use flow_core::{ErrorKind, FlowError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};
use std::path::Path;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 protocol types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ToolContent {
    r#type: &'static str,
    text: String,
}

#[derive(Debug, Serialize)]
struct ToolCallResult {
    content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    is_error: bool,
    #[serde(rename = "errorKind", skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
}

impl ToolCallResult {
    fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent {
                r#type: "text",
                text,
            }],
            is_error: false,
            error_kind: None,
        }
    }

    fn error(e: &FlowError) -> Self {
        Self {
            content: vec![ToolContent {
                r#type: "text",
                text: format!("❌ {e}"),
            }],
            is_error: true,
            error_kind: Some(e.kind()),
        }
    }
}

impl JsonRpcResponse {
    fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

pub fn run(root: &Path) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let tools = tools::all_tools();
    tracing::info!(root = %root.display(), tools = tools.len(), "mcp server ready on stdio");

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Err(e) => JsonRpcResponse::err(None, -32700, format!("parse error: {e}")),
            // Notifications carry no id and get no response.
            Ok(raw) if !raw.as_object().is_some_and(|o| o.contains_key("id")) => continue,
            Ok(raw) => match serde_json::from_value::<JsonRpcRequest>(raw) {
                Ok(request) => handle_request(&request, &tools, root),
                Err(e) => JsonRpcResponse::err(None, -32600, format!("invalid request: {e}")),
            },
        };

        let mut out = stdout.lock();
        serde_json::to_writer(&mut out, &response)?;
        writeln!(out)?;
        out.flush()?;
    }

    tracing::info!("stdin closed, mcp server exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Request dispatch (pub for unit tests)
// ---------------------------------------------------------------------------

pub fn handle_request(req: &JsonRpcRequest, tools: &[ToolInfo], root: &Path) -> JsonRpcResponse {
    let id = req.id.clone();
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::ok(
            id,
            serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "flow",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),

        "tools/list" => {
            let tool_list: Vec<Value> = tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "name": t.name,
                        "description": t.description,
                        "inputSchema": (t.schema)()
                    })
                })
                .collect();
            JsonRpcResponse::ok(id, serde_json::json!({ "tools": tool_list }))
        }

        "tools/call" => {
            let Some(params) = &req.params else {
                return JsonRpcResponse::err(id, -32602, "missing params");
            };
            let Some(tool_name) = params["name"].as_str() else {
                return JsonRpcResponse::err(id, -32602, "missing tool name in params");
            };
            let args = params.get("arguments").cloned().unwrap_or(Value::Null);

            let call_result = match ToolCall::parse(tool_name, args) {
                Ok(None) => {
                    return JsonRpcResponse::err(id, -32601, format!("tool not found: {tool_name}"));
                }
                Ok(Some(call)) => match tools::dispatch(call, root) {
                    Ok(text) => ToolCallResult::text(text),
                    Err(e) => {
                        tracing::warn!(tool = tool_name, kind = %e.kind(), error = %e, "tool call failed");
                        ToolCallResult::error(&e)
                    }
                },
                Err(e) => ToolCallResult::error(&e),
            };

            match serde_json::to_value(&call_result) {
                Ok(result) => JsonRpcResponse::ok(id, result),
                Err(e) => JsonRpcResponse::err(id, -32603, format!("internal error: {e}")),
            }
        }

        other => JsonRpcResponse::err(id, -32601, format!("method not found: {other}")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_req(id: i64, method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".into(),
            id: Some(Value::Number(id.into())),
            method: method.to_string(),
            params,
        }
    }

    fn call(dir: &TempDir, name: &str, arguments: Value) -> Value {
        let tools = tools::all_tools();
        let req = make_req(
            9,
            "tools/call",
            Some(serde_json::json!({ "name": name, "arguments": arguments })),
        );
        let resp = handle_request(&req, &tools, dir.path());
        assert!(resp.error.is_none());
        resp.result.unwrap()
    }

    #[test]
    fn initialize_returns_capabilities() {
        let dir = TempDir::new().unwrap();
        let tools = tools::all_tools();
        let req = make_req(
            1,
            "initialize",
            Some(serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test", "version": "0.0.1"}
            })),
        );

        let resp = handle_request(&req, &tools, dir.path());
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert!(result["capabilities"]["tools"].is_object());
        assert_eq!(result["serverInfo"]["name"], "flow");
    }

    #[test]
    fn tools_list_returns_every_tool() {
        let dir = TempDir::new().unwrap();
        let tools = tools::all_tools();
        let req = make_req(2, "tools/list", Some(serde_json::json!({})));

        let resp = handle_request(&req, &tools, dir.path());
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        let tool_list = result["tools"].as_array().unwrap();
        assert_eq!(tool_list.len(), 13);

        let names: Vec<&str> = tool_list
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        for expected in [
            "create_task",
            "list_tasks",
            "validate_task",
            "get_task_info",
            "get_project_status",
            "generate_business_context",
            "generate_approach",
            "generate_completion_report",
            "analyze_codebase",
            "update_project_context",
            "init_flow_project",
            "check_agents_update",
            "update_agents_template",
        ] {
            assert!(names.contains(&expected), "{expected}");
        }
        assert!(tool_list.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[test]
    fn tools_call_unknown_tool_returns_error() {
        let dir = TempDir::new().unwrap();
        let tools = tools::all_tools();
        let req = make_req(
            3,
            "tools/call",
            Some(serde_json::json!({
                "name": "nonexistent_tool",
                "arguments": {}
            })),
        );

        let resp = handle_request(&req, &tools, dir.path());
        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().code, -32601);
    }

    #[test]
    fn create_then_list() {
        let dir = TempDir::new().unwrap();
        let result = call(
            &dir,
            "create_task",
            serde_json::json!({"taskName": "login", "taskType": "bug"}),
        );
        assert_eq!(result["isError"], false);
        assert!(result.get("errorKind").is_none());
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("00_login"));

        let result = call(&dir, "list_tasks", Value::Null);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("00 🐛 login"));
    }

    #[test]
    fn not_found_carries_error_kind() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".flow/00_auth")).unwrap();
        let result = call(&dir, "validate_task", serde_json::json!({"taskName": "oauth"}));
        assert_eq!(result["isError"], true);
        assert_eq!(result["errorKind"], "not_found");
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("list tasks to see available names"));
    }

    #[test]
    fn ambiguous_name_carries_error_kind() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".flow/00_auth")).unwrap();
        std::fs::create_dir_all(dir.path().join(".flow/03_auth")).unwrap();
        let result = call(&dir, "get_task_info", serde_json::json!({"taskName": "auth"}));
        assert_eq!(result["isError"], true);
        assert_eq!(result["errorKind"], "ambiguous_match");
    }

    #[test]
    fn bad_arguments_are_invalid_input() {
        let dir = TempDir::new().unwrap();
        let result = call(&dir, "create_task", serde_json::json!({"taskType": "bug"}));
        assert_eq!(result["isError"], true);
        assert_eq!(result["errorKind"], "invalid_input");
        assert!(!dir.path().join(".flow").exists());
    }

    #[test]
    fn unknown_method_returns_method_not_found() {
        let dir = TempDir::new().unwrap();
        let tools = tools::all_tools();
        let req = make_req(6, "unknown/method", None);

        let resp = handle_request(&req, &tools, dir.path());
        assert!(resp.result.is_none());
        let err = resp.error.unwrap();
        assert_eq!(err.code, -32601);
        assert!(err.message.contains("method not found"));
    }

    #[test]
    fn tools_call_missing_params_returns_error() {
        let dir = TempDir::new().unwrap();
        let tools = tools::all_tools();
        let req = make_req(7, "tools/call", None);

        let resp = handle_request(&req, &tools, dir.path());
        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().code, -32602);
    }
}
