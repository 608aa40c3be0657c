//! Admin panel state: user list, notices, and the conversation viewer.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use crate::net::error::ApiError;
use crate::net::types::{ConversationMessage, ConversationSession, ManagedUser};

#[derive(Clone, Debug, Default)]
pub struct AdminState {
    pub users: Vec<ManagedUser>,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    pub viewer: ConversationViewer,
}

impl AdminState {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish_load(&mut self, result: Result<Vec<ManagedUser>, ApiError>) {
        self.loading = false;
        match result {
            Ok(users) => self.users = users,
            Err(e) => {
                log::warn!("failed to load users: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Outcome of a create/update/delete action. Success messages replace any
    /// previous error and vice versa.
    pub fn record_action(&mut self, result: Result<String, ApiError>) {
        match result {
            Ok(message) => {
                self.error = None;
                self.success = Some(message);
            }
            Err(e) => {
                self.success = None;
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn dismiss_notices(&mut self) {
        self.error = None;
        self.success = None;
    }
}

/// Stored assistant conversations of one selected user.
#[derive(Clone, Debug, Default)]
pub struct ConversationViewer {
    pub username: Option<String>,
    pub sessions: Vec<ConversationSession>,
    pub selected_session: Option<String>,
    pub messages: Vec<ConversationMessage>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ConversationViewer {
    pub fn open(&mut self, username: &str) {
        *self = Self { username: Some(username.to_owned()), loading: true, ..Self::default() };
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn finish_sessions(&mut self, result: Result<Vec<ConversationSession>, ApiError>) {
        self.loading = false;
        match result {
            Ok(sessions) => self.sessions = sessions,
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn select(&mut self, session_id: &str) {
        self.selected_session = Some(session_id.to_owned());
        self.messages.clear();
        self.error = None;
        self.loading = true;
    }

    pub fn finish_messages(&mut self, result: Result<Vec<ConversationMessage>, ApiError>) {
        self.loading = false;
        match result {
            Ok(messages) => self.messages = messages,
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Drop a deleted conversation, deselecting it if it was open.
    pub fn remove_session(&mut self, session_id: &str) {
        self.sessions.retain(|s| s.session_id != session_id);
        if self.selected_session.as_deref() == Some(session_id) {
            self.selected_session = None;
            self.messages.clear();
        }
    }
}
