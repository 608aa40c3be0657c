//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`session`, `tasks`, `chat`, `admin`) so individual
//! components can depend on small focused models. `session` is the only
//! module that owns persisted data; `auth` wraps it for reactive callers.

pub mod admin;
pub mod auth;
pub mod chat;
pub mod session;
pub mod tasks;
