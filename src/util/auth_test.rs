use super::*;
use crate::net::types::{AuthUser, Role};

fn session(token: Option<&str>, role: Option<Role>, hydrated: bool) -> Session {
    let user = role.map(|role| AuthUser { username: "alice".to_owned(), role, email: None });
    Session {
        is_authenticated: token.is_some() && user.is_some(),
        is_admin: role == Some(Role::Admin),
        token: token.map(str::to_owned),
        user,
        has_hydrated: hydrated,
    }
}

// =============================================================
// evaluate_auth_guard
// =============================================================

#[test]
fn guard_waits_for_hydration_without_redirecting() {
    let s = session(None, None, false);
    let outcome = evaluate_auth_guard(&s, CheckStatus::NotStarted);
    assert_eq!(outcome, GuardOutcome::AwaitHydration);
    assert_eq!(outcome.redirect_target(), None);
    assert_eq!(outcome.loading_message(), Some("Loading..."));
}

#[test]
fn guard_redirects_to_login_without_token() {
    let s = session(None, None, true);
    let outcome = evaluate_auth_guard(&s, CheckStatus::NotStarted);
    assert_eq!(outcome, GuardOutcome::RedirectToLogin);
    assert_eq!(outcome.redirect_target(), Some(LOGIN_ROUTE));
}

#[test]
fn guard_starts_check_when_token_present() {
    let s = session(Some("t"), Some(Role::User), true);
    assert_eq!(evaluate_auth_guard(&s, CheckStatus::NotStarted), GuardOutcome::StartCheck);
    assert_eq!(evaluate_auth_guard(&s, CheckStatus::Pending), GuardOutcome::Verifying);
    assert_eq!(
        GuardOutcome::Verifying.loading_message(),
        Some("Verifying authentication...")
    );
}

#[test]
fn guard_renders_after_passed_check() {
    let s = session(Some("t"), Some(Role::User), true);
    assert_eq!(evaluate_auth_guard(&s, CheckStatus::Passed), GuardOutcome::Render);
}

#[test]
fn guard_redirects_after_failed_check() {
    let s = session(Some("t"), Some(Role::User), true);
    assert_eq!(evaluate_auth_guard(&s, CheckStatus::Failed), GuardOutcome::RedirectToLogin);
}

#[test]
fn guard_does_not_render_unauthenticated_session_even_if_check_passed() {
    let mut s = session(Some("t"), Some(Role::User), true);
    s.is_authenticated = false;
    assert_eq!(evaluate_auth_guard(&s, CheckStatus::Passed), GuardOutcome::RedirectToLogin);
}

// =============================================================
// evaluate_admin_guard
// =============================================================

#[test]
fn admin_guard_sends_regular_users_to_landing() {
    let s = session(Some("t"), Some(Role::User), true);
    let outcome = evaluate_admin_guard(&s, CheckStatus::Passed);
    assert_eq!(outcome, GuardOutcome::RedirectToLanding);
    assert_eq!(outcome.redirect_target(), Some(LANDING_ROUTE));
}

#[test]
fn admin_guard_renders_for_admins() {
    let s = session(Some("t"), Some(Role::Admin), true);
    assert_eq!(evaluate_admin_guard(&s, CheckStatus::Passed), GuardOutcome::Render);
}

#[test]
fn admin_guard_defers_to_base_guard_first() {
    let s = session(Some("t"), Some(Role::User), true);
    assert_eq!(evaluate_admin_guard(&s, CheckStatus::Pending), GuardOutcome::Verifying);
    let anon = session(None, None, true);
    assert_eq!(evaluate_admin_guard(&anon, CheckStatus::NotStarted), GuardOutcome::RedirectToLogin);
}

// =============================================================
// evaluate_login_route
// =============================================================

#[test]
fn login_route_waits_for_hydration() {
    assert_eq!(evaluate_login_route(&session(None, None, false)), GuardOutcome::AwaitHydration);
}

#[test]
fn login_route_forwards_authenticated_users() {
    let s = session(Some("t"), Some(Role::User), true);
    assert_eq!(evaluate_login_route(&s), GuardOutcome::RedirectToLanding);
}

#[test]
fn login_route_renders_form_for_anonymous_users() {
    assert_eq!(evaluate_login_route(&session(None, None, true)), GuardOutcome::Render);
}
