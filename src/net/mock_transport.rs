//! Scripted transport for client and session tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;

use super::error::ApiError;
use super::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Replays queued responses in order and records every request it sees.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: serde_json::Value) -> Self {
        self.respond_text(status, &body.to_string())
    }

    pub(crate) fn respond_text(self, status: u16, body: &str) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse { status, body: body.to_owned() }));
        self
    }

    pub(crate) fn fail(self, err: ApiError) -> Self {
        self.responses.borrow_mut().push_back(Err(err));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests.borrow().last().cloned().expect("no request was sent")
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".to_owned())))
    }
}
