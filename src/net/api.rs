//! Bundle of the remote API clients sharing one base URL and transport.
//!
//! Provided once via Leptos context by `App`; pages pull the client they need
//! with `expect_context::<Api>()`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::admin_client::AdminClient;
use super::ai_client::AiClient;
use super::auth_client::AuthClient;
use super::error::ApiError;
use super::mcp_client::McpClient;
use super::transport::{DefaultTransport, HttpTransport};
use crate::config::ApiConfig;

#[derive(Clone, Debug)]
pub struct ApiClients<T = DefaultTransport> {
    pub auth: AuthClient<T>,
    pub mcp: McpClient<T>,
    pub ai: AiClient<T>,
    pub admin: AdminClient<T>,
}

/// The clients used by the running app.
pub type Api = ApiClients<DefaultTransport>;

impl<T: HttpTransport + Clone> ApiClients<T> {
    pub fn new(config: &ApiConfig, transport: T) -> Self {
        Self {
            auth: AuthClient::new(config.clone(), transport.clone()),
            mcp: McpClient::new(config.clone(), transport.clone()),
            ai: AiClient::new(config.clone(), transport.clone()),
            admin: AdminClient::new(config.clone(), transport),
        }
    }
}

impl Api {
    /// Build the app's clients from the compile-time API URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` when `TASKLOG_API_URL` is missing or invalid.
    pub fn from_build_env() -> Result<Self, ApiError> {
        let config = ApiConfig::from_build_env()?;
        log::info!("api base url: {}", config.base_url());
        Ok(Self::new(&config, DefaultTransport::default()))
    }
}
