//! Task server client speaking the MCP `tools/call` envelope over HTTP.
//!
//! SYSTEM CONTEXT
//! ==============
//! The task server exposes `log_task`, `get_tasks`, `update_task`,
//! `delete_task` and `generate_report` as MCP tools behind `POST /mcp`.
//! Tool output is human-oriented text with an embedded JSON payload, so task
//! records are cut out of the first content block before decoding.
//!
//! TRADE-OFFS
//! ==========
//! An unreadable task list degrades to an empty list and an unreadable single
//! task to a placeholder carrying the raw text; the tool call itself already
//! succeeded, so the user sees the server's words instead of an error.

#[cfg(test)]
#[path = "mcp_client_test.rs"]
mod mcp_client_test;

use serde::Deserialize;
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use super::error::ApiError;
use super::transport::{DefaultTransport, HttpRequest, HttpTransport, Method};
use super::types::{GenerateReportRequest, GetTasksFilters, LogTaskRequest, Task, TaskStatus, TaskType, UpdateTaskRequest};
use crate::config::ApiConfig;

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<ToolResult>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ToolResult {
    #[serde(default)]
    content: Vec<ToolContent>,
    #[serde(default, rename = "isError")]
    is_error: bool,
}

#[derive(Debug, Deserialize)]
struct ToolContent {
    #[serde(default)]
    text: String,
}

#[derive(Clone, Debug)]
pub struct McpClient<T = DefaultTransport> {
    config: ApiConfig,
    transport: T,
}

impl<T: HttpTransport> McpClient<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Record a task with the `log_task` tool.
    ///
    /// # Errors
    ///
    /// Returns the transport/remote error, or the tool's own error text.
    pub async fn log_task(&self, token: &str, request: &LogTaskRequest) -> Result<Task, ApiError> {
        let text = self
            .call_tool(token, "log_task", serde_json::to_value(request)?, "Failed to log task")
            .await?;
        Ok(parse_task_text(&text, OffsetDateTime::now_utc()))
    }

    /// List tasks matching `filters` with the `get_tasks` tool.
    ///
    /// # Errors
    ///
    /// Returns the transport/remote error, or the tool's own error text.
    pub async fn get_tasks(&self, token: &str, filters: &GetTasksFilters) -> Result<Vec<Task>, ApiError> {
        let text = self
            .call_tool(token, "get_tasks", serde_json::to_value(filters)?, "Failed to get tasks")
            .await?;
        Ok(parse_tasks_text(&text))
    }

    /// Patch a task with the `update_task` tool.
    ///
    /// # Errors
    ///
    /// Returns the transport/remote error, or the tool's own error text.
    pub async fn update_task(&self, token: &str, request: &UpdateTaskRequest) -> Result<Task, ApiError> {
        let text = self
            .call_tool(token, "update_task", serde_json::to_value(request)?, "Failed to update task")
            .await?;
        Ok(parse_task_text(&text, OffsetDateTime::now_utc()))
    }

    /// Remove a task with the `delete_task` tool.
    ///
    /// # Errors
    ///
    /// Returns the transport/remote error, or the tool's own error text.
    pub async fn delete_task(
        &self,
        token: &str,
        task_id: &str,
        client_name: &str,
        project_name: &str,
    ) -> Result<(), ApiError> {
        let args = json!({ "task_id": task_id, "client_name": client_name, "project_name": project_name });
        self.call_tool(token, "delete_task", args, "Failed to delete task").await?;
        Ok(())
    }

    /// Render a report server-side with the `generate_report` tool.
    ///
    /// # Errors
    ///
    /// Returns the transport/remote error, or the tool's own error text.
    pub async fn generate_report(&self, token: &str, request: &GenerateReportRequest) -> Result<String, ApiError> {
        self.call_tool(token, "generate_report", serde_json::to_value(request)?, "Failed to generate report")
            .await
    }

    /// Invoke one tool and return the text of its first content block.
    async fn call_tool(&self, token: &str, tool: &str, arguments: Value, failure: &str) -> Result<String, ApiError> {
        let body = json!({
            "method": "tools/call",
            "params": { "name": tool, "arguments": arguments },
        });
        let req = HttpRequest::new(Method::Post, self.config.endpoint(&["mcp"]))
            .bearer(token)
            .json(body);
        let resp = self.transport.send(req).await?;
        let status = resp.status;
        let resp = resp.into_success(&format!("MCP request failed: {status}"))?;

        let envelope: RpcEnvelope = resp.json()?;
        if let Some(err) = envelope.error {
            let message = err.message.unwrap_or_else(|| "MCP tool call failed".to_owned());
            log::warn!("mcp tool {tool} returned rpc error: {message}");
            return Err(ApiError::Remote { status, message });
        }
        let result = envelope
            .result
            .ok_or_else(|| ApiError::Parse(format!("MCP response for {tool} has no result")))?;
        let text = result.content.into_iter().next().map(|c| c.text).unwrap_or_default();
        if result.is_error {
            let message = if text.trim().is_empty() { failure.to_owned() } else { text };
            return Err(ApiError::Remote { status, message });
        }
        Ok(text)
    }
}

/// Slice from the first `open` to the last `close`, inclusive.
fn json_block(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Decode the task embedded in tool output, or build a placeholder from the
/// raw text stamped with `now`.
pub(crate) fn parse_task_text(text: &str, now: OffsetDateTime) -> Task {
    if let Some(block) = json_block(text, '{', '}') {
        match serde_json::from_str::<Task>(block) {
            Ok(task) => return task,
            Err(e) => log::warn!("task payload did not decode: {e}"),
        }
    }
    Task {
        task_description: text.to_owned(),
        task_type: TaskType::Completed,
        status: TaskStatus::Completed,
        task_date: now.date().format(format_description!("[year]-[month]-[day]")).unwrap_or_default(),
        date_logged: now.format(&Rfc3339).unwrap_or_default(),
        ..Task::default()
    }
}

/// Decode the task list embedded in tool output; empty when unreadable.
pub(crate) fn parse_tasks_text(text: &str) -> Vec<Task> {
    let Some(block) = json_block(text, '[', ']') else {
        return Vec::new();
    };
    serde_json::from_str(block).unwrap_or_else(|e| {
        log::warn!("task list payload did not decode: {e}");
        Vec::new()
    })
}
