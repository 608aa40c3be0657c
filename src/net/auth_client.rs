//! Auth API client: login, token verification, profile, password change.
//!
//! SYSTEM CONTEXT
//! ==============
//! `verify` backs the session store's `check_auth`, so it reports the remote
//! verdict as a plain boolean (2xx or not) and leaves fail-closed handling to
//! the store. Every other call surfaces the server's error `message`.

#[cfg(test)]
#[path = "auth_client_test.rs"]
mod auth_client_test;

use async_trait::async_trait;
use serde_json::json;

use super::error::ApiError;
use super::transport::{DefaultTransport, HttpRequest, HttpTransport, Method};
use super::types::{AuthUser, LoginResponse};
use crate::config::ApiConfig;
use crate::state::session::TokenVerifier;

const LOGIN_FAILED: &str = "Login failed";
const PROFILE_FAILED: &str = "Failed to get user";
const CHANGE_PASSWORD_FAILED: &str = "Password change failed";

#[derive(Clone, Debug)]
pub struct AuthClient<T = DefaultTransport> {
    config: ApiConfig,
    transport: T,
}

impl<T: HttpTransport> AuthClient<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Exchange credentials for a bearer token via `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for rejected credentials, or the
    /// transport/remote/parse error otherwise.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let req = HttpRequest::new(Method::Post, self.config.endpoint(&["auth", "login"]))
            .json(json!({ "username": username, "password": password }));
        let resp = self.transport.send(req).await?.into_success(LOGIN_FAILED)?;
        resp.json()
    }

    /// Ask `POST /auth/verify` whether `token` is still valid.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received.
    pub async fn verify(&self, token: &str) -> Result<bool, ApiError> {
        let req = HttpRequest::new(Method::Post, self.config.endpoint(&["auth", "verify"])).bearer(token);
        let resp = self.transport.send(req).await?;
        if !resp.ok() {
            log::info!("token verification rejected: status {}", resp.status);
        }
        Ok(resp.ok())
    }

    /// Fetch the profile behind `token` from `GET /auth/me`.
    ///
    /// # Errors
    ///
    /// Returns the transport/remote/parse error.
    pub async fn current_user(&self, token: &str) -> Result<AuthUser, ApiError> {
        let req = HttpRequest::new(Method::Get, self.config.endpoint(&["auth", "me"])).bearer(token);
        let resp = self.transport.send(req).await?.into_success(PROFILE_FAILED)?;
        resp.json()
    }

    /// Change the caller's password via `POST /auth/change-password`.
    ///
    /// # Errors
    ///
    /// Returns the server's message (e.g. wrong current password) as
    /// `ApiError::Remote`/`Unauthorized`, or the transport error.
    pub async fn change_password(&self, token: &str, old_password: &str, new_password: &str) -> Result<(), ApiError> {
        let req = HttpRequest::new(Method::Post, self.config.endpoint(&["auth", "change-password"]))
            .bearer(token)
            .json(json!({ "oldPassword": old_password, "newPassword": new_password }));
        self.transport.send(req).await?.into_success(CHANGE_PASSWORD_FAILED)?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> TokenVerifier for AuthClient<T> {
    async fn verify_token(&self, token: &str) -> Result<bool, ApiError> {
        self.verify(token).await
    }
}
