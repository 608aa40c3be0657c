use futures::executor::block_on;
use serde_json::json;
use time::macros::datetime;

use super::*;
use crate::net::mock_transport::MockTransport;

fn client(transport: MockTransport) -> McpClient<MockTransport> {
    McpClient::new(ApiConfig::new("https://api.example.test").unwrap(), transport)
}

fn tool_text(text: &str) -> Value {
    json!({ "result": { "content": [{ "type": "text", "text": text }] } })
}

const TASK_JSON: &str = r#"{"task_id":"t-1","user_name":"alice","client_name":"Acme","project_name":"Site","task_description":"Fix header","task_type":"completed","task_date":"2026-10-19","date_logged":"2026-10-19T09:00:00Z","status":"completed","actual_hours":1.5}"#;

// =============================================================
// Envelope
// =============================================================

#[test]
fn get_tasks_wraps_filters_in_tools_call_envelope() {
    let mcp = client(MockTransport::new().respond(200, tool_text("Found 0 tasks: []")));
    let filters = GetTasksFilters { user_name: Some("alice".to_owned()), limit: Some(50), ..GetTasksFilters::default() };

    let tasks = block_on(mcp.get_tasks("tok", &filters)).unwrap();
    assert!(tasks.is_empty());

    let req = mcp.transport().last_request();
    assert_eq!(req.url, "https://api.example.test/mcp");
    assert_eq!(req.bearer.as_deref(), Some("tok"));
    assert_eq!(
        req.body,
        Some(json!({
            "method": "tools/call",
            "params": { "name": "get_tasks", "arguments": { "user_name": "alice", "limit": 50 } }
        }))
    );
}

#[test]
fn get_tasks_extracts_list_from_text() {
    let text = format!("Here are your tasks:\n[{TASK_JSON}]\nThat's all.");
    let mcp = client(MockTransport::new().respond(200, tool_text(&text)));
    let tasks = block_on(mcp.get_tasks("tok", &GetTasksFilters::default())).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task_id, "t-1");
    assert_eq!(tasks[0].actual_hours, Some(1.5));
}

#[test]
fn tool_is_error_surfaces_content_text() {
    let body = json!({ "result": { "content": [{ "type": "text", "text": "client_name is required" }], "isError": true } });
    let mcp = client(MockTransport::new().respond(200, body));
    let err = block_on(mcp.log_task("tok", &LogTaskRequest::default())).unwrap_err();
    assert_eq!(err.to_string(), "client_name is required");
}

#[test]
fn tool_is_error_without_text_uses_operation_message() {
    let body = json!({ "result": { "content": [], "isError": true } });
    let mcp = client(MockTransport::new().respond(200, body));
    let err = block_on(mcp.delete_task("tok", "t-1", "Acme", "Site")).unwrap_err();
    assert_eq!(err.to_string(), "Failed to delete task");
}

#[test]
fn rpc_error_surfaces_message() {
    let mcp = client(MockTransport::new().respond(200, json!({ "error": { "code": -32601, "message": "unknown tool" } })));
    let err = block_on(mcp.generate_report(
        "tok",
        &GenerateReportRequest {
            report_type: crate::net::types::ReportType::Detailed,
            date_range: "today".to_owned(),
            client_name: None,
            project_name: None,
            user_name: None,
            date_filter_type: None,
            group_by: None,
            include_hours: None,
        },
    ))
    .unwrap_err();
    assert_eq!(err, ApiError::Remote { status: 200, message: "unknown tool".to_owned() });
}

#[test]
fn http_failure_without_body_reports_status() {
    let mcp = client(MockTransport::new().respond_text(500, "boom"));
    let err = block_on(mcp.get_tasks("tok", &GetTasksFilters::default())).unwrap_err();
    assert_eq!(err.to_string(), "MCP request failed: 500");
}

#[test]
fn http_401_is_auth_failure() {
    let mcp = client(MockTransport::new().respond(401, json!({ "message": "Token expired" })));
    let err = block_on(mcp.get_tasks("tok", &GetTasksFilters::default())).unwrap_err();
    assert!(err.is_auth_failure());
}

#[test]
fn delete_task_sends_key_fields() {
    let mcp = client(MockTransport::new().respond(200, tool_text("Task deleted")));
    block_on(mcp.delete_task("tok", "t-9", "Acme", "Site")).unwrap();
    let body = mcp.transport().last_request().body.unwrap();
    assert_eq!(
        body["params"]["arguments"],
        json!({ "task_id": "t-9", "client_name": "Acme", "project_name": "Site" })
    );
}

#[test]
fn generate_report_returns_raw_text() {
    let mcp = client(MockTransport::new().respond(200, tool_text("# Weekly report\n- 3 tasks")));
    let req = GenerateReportRequest {
        report_type: crate::net::types::ReportType::UserSummary,
        date_range: "this_week".to_owned(),
        client_name: None,
        project_name: None,
        user_name: Some("alice".to_owned()),
        date_filter_type: None,
        group_by: None,
        include_hours: Some(true),
    };
    assert_eq!(block_on(mcp.generate_report("tok", &req)).unwrap(), "# Weekly report\n- 3 tasks");
}

// =============================================================
// Text payload parsing
// =============================================================

#[test]
fn parse_task_text_decodes_embedded_object() {
    let text = format!("Task logged successfully!\n{TASK_JSON}");
    let task = parse_task_text(&text, datetime!(2026-10-19 12:30:00 UTC));
    assert_eq!(task.task_id, "t-1");
    assert_eq!(task.client_name, "Acme");
}

#[test]
fn parse_task_text_falls_back_to_placeholder() {
    let task = parse_task_text("Task logged for Acme", datetime!(2026-10-19 12:30:00 UTC));
    assert_eq!(task.task_id, "");
    assert_eq!(task.task_description, "Task logged for Acme");
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.task_date, "2026-10-19");
    assert_eq!(task.date_logged, "2026-10-19T12:30:00Z");
}

#[test]
fn parse_tasks_text_without_array_is_empty() {
    assert!(parse_tasks_text("No tasks found.").is_empty());
}

#[test]
fn parse_tasks_text_with_garbage_array_is_empty() {
    assert!(parse_tasks_text("[not, json]").is_empty());
}

#[test]
fn json_block_requires_close_after_open() {
    assert_eq!(json_block("} then {", '{', '}'), None);
    assert_eq!(json_block("x {\"a\":1} y", '{', '}'), Some("{\"a\":1}"));
}
