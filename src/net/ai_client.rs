//! AI proxy client for conversational task logging.
//!
//! SYSTEM CONTEXT
//! ==============
//! The proxy owns the conversation: it keeps history server-side and hands
//! back a conversation id that the client echoes on the next prompt.
//!
//! DESIGN
//! ======
//! The proxy is inconsistent about field names (`response`/`message`,
//! `toolResults`/`tool_results`, `session_id`/`sessionId`). They are folded
//! into the single-named `AiReply` here so nothing past this boundary sees
//! the variants.

#[cfg(test)]
#[path = "ai_client_test.rs"]
mod ai_client_test;

use serde_json::{Value, json};

use super::error::ApiError;
use super::transport::{DefaultTransport, HttpRequest, HttpTransport, Method};
use super::types::AiReply;
use crate::config::ApiConfig;

const DEFAULT_REPLY: &str = "Task logged successfully";

#[derive(Clone, Debug)]
pub struct AiClient<T = DefaultTransport> {
    config: ApiConfig,
    transport: T,
}

impl<T: HttpTransport> AiClient<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one prompt to `POST /ai/log-task`, continuing `session_id` when given.
    ///
    /// # Errors
    ///
    /// Returns the transport/remote error, `ApiError::Parse` for a non-JSON
    /// body, or `ApiError::Remote` when the proxy reports only an `error`.
    pub async fn send_message(&self, token: &str, prompt: &str, session_id: Option<&str>) -> Result<AiReply, ApiError> {
        let mut body = json!({ "prompt": prompt });
        if let Some(id) = session_id {
            body["session_id"] = json!(id);
        }
        let req = HttpRequest::new(Method::Post, self.config.endpoint(&["ai", "log-task"]))
            .bearer(token)
            .json(body);
        let resp = self.transport.send(req).await?;
        let status = resp.status;
        let resp = resp.into_success(&format!("HTTP {status}"))?;
        let raw: Value = resp.json()?;
        normalize_reply(status, &raw)
    }
}

fn str_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Fold the proxy's naming variants into one `AiReply`.
pub(crate) fn normalize_reply(status: u16, raw: &Value) -> Result<AiReply, ApiError> {
    let message = str_field(raw, "response").or_else(|| str_field(raw, "message"));
    if message.is_none() {
        if let Some(error) = str_field(raw, "error") {
            return Err(ApiError::Remote { status, message: error.to_owned() });
        }
    }

    let camel = raw.get("toolResults").and_then(Value::as_array);
    let snake = raw.get("tool_results").and_then(Value::as_array);
    if let (Some(a), Some(b)) = (camel, snake) {
        if a != b {
            log::warn!("ai reply carries diverging toolResults and tool_results; using toolResults");
        }
    }

    Ok(AiReply {
        message: message.unwrap_or(DEFAULT_REPLY).to_owned(),
        tool_results: camel.or(snake).cloned(),
        session_id: str_field(raw, "session_id")
            .or_else(|| str_field(raw, "sessionId"))
            .map(str::to_owned),
    })
}
