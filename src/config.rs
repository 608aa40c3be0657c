//! API endpoint configuration.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every remote collaborator (auth, MCP tasks, AI proxy, admin) lives under a
//! single base URL baked into the WASM bundle at build time. Endpoint paths
//! are appended per call with percent-encoded segments.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use url::Url;

use crate::net::error::ApiError;

/// Build-time environment variable naming the API base URL.
pub const API_URL_ENV: &str = "TASKLOG_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
}

impl ApiConfig {
    /// Build config from the `TASKLOG_API_URL` value captured at compile time.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` when the variable was unset or invalid.
    pub fn from_build_env() -> Result<Self, ApiError> {
        Self::new(option_env!("TASKLOG_API_URL").unwrap_or_default())
    }

    /// Parse an absolute base URL, dropping trailing slashes.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` for empty, relative, or non-hierarchical URLs.
    pub fn new(raw: &str) -> Result<Self, ApiError> {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ApiError::Config(format!("{API_URL_ENV} is not set")));
        }
        let base_url =
            Url::parse(trimmed).map_err(|e| ApiError::Config(format!("invalid {API_URL_ENV} '{trimmed}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!("{API_URL_ENV} '{trimmed}' cannot carry a path")));
        }
        Ok(Self { base_url })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }
}
