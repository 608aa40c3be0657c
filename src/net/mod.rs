//! Networking modules for the remote REST collaborators.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` is the single HTTP seam, `types` defines the shared wire
//! schema, and each `*_client` maps one remote API onto typed calls. `api`
//! bundles the clients for context injection.

pub mod admin_client;
pub mod ai_client;
pub mod api;
pub mod auth_client;
pub mod error;
pub mod mcp_client;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod mock_transport;
