//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Protected pages wrap themselves in a guard.

pub mod admin;
pub mod dashboard;
pub mod login;
pub mod settings;
