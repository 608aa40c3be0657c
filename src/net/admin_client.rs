//! Admin API client: user management and conversation review.
//!
//! Every call requires an admin bearer token; the server enforces the role,
//! the client only forwards the token.

#[cfg(test)]
#[path = "admin_client_test.rs"]
mod admin_client_test;

use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::transport::{DefaultTransport, HttpRequest, HttpTransport, Method};
use super::types::{ConversationMessage, ConversationSession, ManagedUser, NewUserRequest, Role};
use crate::config::ApiConfig;

#[derive(Debug, Deserialize)]
struct UsersBody {
    #[serde(default)]
    users: Vec<ManagedUser>,
}

#[derive(Debug, Deserialize)]
struct SessionsBody {
    #[serde(default)]
    sessions: Vec<ConversationSession>,
}

#[derive(Debug, Deserialize)]
struct MessagesBody {
    #[serde(default)]
    messages: Vec<ConversationMessage>,
}

#[derive(Clone, Debug)]
pub struct AdminClient<T = DefaultTransport> {
    config: ApiConfig,
    transport: T,
}

impl<T: HttpTransport> AdminClient<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// # Errors
    ///
    /// Returns the transport/remote/parse error.
    pub async fn list_users(&self, token: &str) -> Result<Vec<ManagedUser>, ApiError> {
        let req = HttpRequest::new(Method::Get, self.config.endpoint(&["admin", "users"])).bearer(token);
        let body: UsersBody = self.transport.send(req).await?.into_success("Failed to load users")?.json()?;
        Ok(body.users)
    }

    /// # Errors
    ///
    /// Returns the server's business-rule message (e.g. duplicate username).
    pub async fn create_user(&self, token: &str, user: &NewUserRequest) -> Result<(), ApiError> {
        let req = HttpRequest::new(Method::Post, self.config.endpoint(&["admin", "users"]))
            .bearer(token)
            .json(serde_json::to_value(user)?);
        self.transport.send(req).await?.into_success("Failed to create user")?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the transport/remote error.
    pub async fn update_role(&self, token: &str, username: &str, role: Role) -> Result<(), ApiError> {
        let req = HttpRequest::new(Method::Put, self.config.endpoint(&["admin", "users", username, "role"]))
            .bearer(token)
            .json(json!({ "role": role }));
        self.transport.send(req).await?.into_success("Failed to update role")?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the transport/remote error.
    pub async fn delete_user(&self, token: &str, username: &str) -> Result<(), ApiError> {
        let req = HttpRequest::new(Method::Delete, self.config.endpoint(&["admin", "users", username])).bearer(token);
        self.transport.send(req).await?.into_success("Failed to delete user")?;
        Ok(())
    }

    /// Stored assistant conversations of `username`, newest first as served.
    ///
    /// # Errors
    ///
    /// Returns the transport/remote/parse error.
    pub async fn list_conversations(&self, token: &str, username: &str) -> Result<Vec<ConversationSession>, ApiError> {
        let req = HttpRequest::new(Method::Get, self.config.endpoint(&["admin", "conversations", username])).bearer(token);
        let body: SessionsBody = self
            .transport
            .send(req)
            .await?
            .into_success("Failed to fetch conversations")?
            .json()?;
        Ok(body.sessions)
    }

    /// # Errors
    ///
    /// Returns the transport/remote/parse error.
    pub async fn conversation_messages(
        &self,
        token: &str,
        username: &str,
        session_id: &str,
    ) -> Result<Vec<ConversationMessage>, ApiError> {
        let url = self.config.endpoint(&["admin", "conversations", username, session_id]);
        let req = HttpRequest::new(Method::Get, url).bearer(token);
        let body: MessagesBody = self
            .transport
            .send(req)
            .await?
            .into_success("Failed to fetch conversation messages")?
            .json()?;
        Ok(body.messages)
    }

    /// # Errors
    ///
    /// Returns the transport/remote error.
    pub async fn delete_conversation(&self, token: &str, username: &str, session_id: &str) -> Result<(), ApiError> {
        let url = self.config.endpoint(&["admin", "conversations", username, session_id]);
        let req = HttpRequest::new(Method::Delete, url).bearer(token);
        self.transport.send(req).await?.into_success("Failed to delete conversation")?;
        Ok(())
    }
}
