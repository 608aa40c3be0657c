//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render page chrome and interaction surfaces while reading/writing
//! shared state from Leptos context providers.

pub mod ai_task_logger;
pub mod auth_guard;
pub mod error_fallback;
pub mod nav_bar;
pub mod task_table;
