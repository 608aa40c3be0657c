//! # tasklog-web
//!
//! Leptos + WASM frontend for the task logger: a persisted authentication
//! session with hydration, schema migration, and remote token verification,
//! plus the dashboard, AI task logger, settings, and admin screens built on
//! top of it.
//!
//! All business logic lives behind remote HTTP APIs (auth, MCP task server,
//! AI proxy, admin). This crate holds the typed clients for those APIs, the
//! client-side state, and the UI.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: wire up logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
