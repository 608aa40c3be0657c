//! HTTP transport seam shared by every API client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Clients build an `HttpRequest`, hand it to an `HttpTransport`, and map the
//! `HttpResponse` themselves. In the browser the transport is `gloo-net`;
//! SSR builds get a transport that always reports `Unavailable`, and tests
//! script responses through a mock.
//!
//! ERROR HANDLING
//! ==============
//! Only failures to obtain a response are transport errors. Status handling
//! and error-body `message` extraction live on `HttpResponse` so every client
//! reports remote failures the same way.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;

/// HTTP verbs used by the remote collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A JSON request, optionally carrying a bearer token.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), bearer: None, body: None }
    }

    #[must_use]
    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_owned());
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status and raw body of a completed exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Parse` when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Human-readable message from an error body, if the server sent one.
    ///
    /// Accepts `{"message": ..}`, `{"error": {"message": ..}}` and
    /// `{"error": ".."}`.
    pub fn error_message(&self) -> Option<String> {
        let value: Value = serde_json::from_str(&self.body).ok()?;
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| value.get("error").and_then(|e| e.get("message")).and_then(Value::as_str))
            .or_else(|| value.get("error").and_then(Value::as_str))?;
        let message = message.trim();
        (!message.is_empty()).then(|| message.to_owned())
    }

    /// Pass 2xx responses through; turn anything else into an `ApiError`
    /// carrying the server message or `fallback`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for 401/403 and `ApiError::Remote`
    /// for every other non-success status.
    pub fn into_success(self, fallback: &str) -> Result<Self, ApiError> {
        if self.ok() {
            return Ok(self);
        }
        let message = self.error_message().unwrap_or_else(|| fallback.to_owned());
        Err(ApiError::from_status(self.status, message))
    }
}

/// Sends one request and returns the response, whatever its status.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Browser transport backed by `gloo-net` (`fetch`).
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        use gloo_net::http::Request;

        let builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        let mut builder = builder.header("Content-Type", "application/json");
        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &format!("Bearer {token}"));
        }
        let prepared = match &request.body {
            Some(body) => builder.json(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Transport(e.to_string()))?;

        let resp = prepared.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

/// Transport for non-browser builds; every call reports `Unavailable`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableTransport;

#[async_trait(?Send)]
impl HttpTransport for UnavailableTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        log::debug!("http {:?} {} skipped outside the browser", request.method, request.url);
        Err(ApiError::Unavailable)
    }
}

#[cfg(feature = "hydrate")]
pub type DefaultTransport = GlooTransport;

#[cfg(not(feature = "hydrate"))]
pub type DefaultTransport = UnavailableTransport;
