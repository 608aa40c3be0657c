//! Shared auth routing helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards and the login page apply identical decisions about when to
//! wait, verify, render, or redirect. The decisions are pure functions over
//! the session so they can be tested without a reactive runtime.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::Session;

/// Login entry point.
pub const LOGIN_ROUTE: &str = "/";
/// Landing view for authenticated users, and the fallback for non-admins.
pub const LANDING_ROUTE: &str = "/dashboard";
pub const SETTINGS_ROUTE: &str = "/settings";
pub const ADMIN_ROUTE: &str = "/admin";

/// Progress of a guard's remote token check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckStatus {
    #[default]
    NotStarted,
    Pending,
    Passed,
    Failed,
}

/// What a guarded view should do right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Persisted state is not loaded yet; render a neutral placeholder.
    AwaitHydration,
    RedirectToLogin,
    /// A token is held but has not been verified for this guard.
    StartCheck,
    Verifying,
    Render,
    RedirectToLanding,
}

impl GuardOutcome {
    /// Route to navigate to, if this outcome is a redirect.
    #[must_use]
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            Self::RedirectToLogin => Some(LOGIN_ROUTE),
            Self::RedirectToLanding => Some(LANDING_ROUTE),
            _ => None,
        }
    }

    #[must_use]
    pub fn loading_message(self) -> Option<&'static str> {
        match self {
            Self::AwaitHydration => Some("Loading..."),
            Self::StartCheck | Self::Verifying => Some("Verifying authentication..."),
            _ => None,
        }
    }
}

/// Base guard: hydrate, then verify any held token, then render.
#[must_use]
pub fn evaluate_auth_guard(session: &Session, check: CheckStatus) -> GuardOutcome {
    if !session.has_hydrated {
        return GuardOutcome::AwaitHydration;
    }
    if session.token.is_none() {
        return GuardOutcome::RedirectToLogin;
    }
    match check {
        CheckStatus::NotStarted => GuardOutcome::StartCheck,
        CheckStatus::Pending => GuardOutcome::Verifying,
        CheckStatus::Passed if session.is_authenticated => GuardOutcome::Render,
        CheckStatus::Passed | CheckStatus::Failed => GuardOutcome::RedirectToLogin,
    }
}

/// Admin guard: the base guard, then the admin role.
#[must_use]
pub fn evaluate_admin_guard(session: &Session, check: CheckStatus) -> GuardOutcome {
    match evaluate_auth_guard(session, check) {
        GuardOutcome::Render if !session.is_admin => GuardOutcome::RedirectToLanding,
        outcome => outcome,
    }
}

/// Login page: skip the form for an already authenticated session.
#[must_use]
pub fn evaluate_login_route(session: &Session) -> GuardOutcome {
    if !session.has_hydrated {
        GuardOutcome::AwaitHydration
    } else if session.is_authenticated {
        GuardOutcome::RedirectToLanding
    } else {
        GuardOutcome::Render
    }
}

/// Navigate, replacing the history entry, whenever `outcome` is a redirect.
pub fn install_guard_redirect<F>(outcome: Memo<GuardOutcome>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let Some(target) = outcome.get().redirect_target() {
            log::debug!("guard redirect -> {target}");
            navigate(target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
