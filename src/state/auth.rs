//! Reactive auth actions over the context-held session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` provides one `RwSignal<SessionStore>`; guards, the login form, the
//! settings page, and the navigation bar call these helpers instead of
//! touching the store directly.
//!
//! DESIGN
//! ======
//! Signal access never spans an await point: each action reads what it needs
//! untracked, awaits the remote call, then applies the result in a single
//! update. A disposed signal is treated like a logged-out session.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use super::session::{SessionStore, TokenVerifier, verify_session_token};
use crate::net::auth_client::AuthClient;
use crate::net::error::ApiError;
use crate::net::transport::HttpTransport;
use crate::net::types::AuthUser;
use crate::util::storage::{BrowserStorage, KeyValueStorage};

/// The session store as provided through context.
pub type SessionSignal<S = BrowserStorage> = RwSignal<SessionStore<S>>;

/// Bearer token of the current session.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` when no token is held.
pub fn require_token<S>(store: SessionSignal<S>) -> Result<String, ApiError>
where
    S: KeyValueStorage + Send + Sync + 'static,
{
    store
        .try_with_untracked(|s| s.session().token.clone())
        .flatten()
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_owned()))
}

/// Verify the held token and clear the session on any failure.
pub async fn check_auth<S, V>(store: SessionSignal<S>, verifier: &V) -> bool
where
    S: KeyValueStorage + Send + Sync + 'static,
    V: TokenVerifier + ?Sized,
{
    let token = store.try_with_untracked(|s| s.session().token.clone()).flatten();
    let outcome = verify_session_token(token.as_deref(), verifier).await;
    store
        .try_update(|s| s.apply_verification(token.as_deref(), &outcome))
        .unwrap_or(false)
}

/// Exchange credentials for a session and adopt it.
///
/// # Errors
///
/// Returns the login failure unchanged; the session is left as it was.
pub async fn login<S, T>(
    store: SessionSignal<S>,
    auth: &AuthClient<T>,
    username: &str,
    password: &str,
) -> Result<AuthUser, ApiError>
where
    S: KeyValueStorage + Send + Sync + 'static,
    T: HttpTransport,
{
    let resp = auth.login(username, password).await?;
    log::info!("signed in as {}", resp.user.username);
    let user = resp.user.clone();
    store.update(|s| s.set_auth(resp.token, resp.user));
    Ok(user)
}

/// Drop the local session. The server keeps no session state to revoke.
pub fn logout<S>(store: SessionSignal<S>)
where
    S: KeyValueStorage + Send + Sync + 'static,
{
    store.update(SessionStore::clear_auth);
}

/// Change the current user's password.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` without a session, otherwise the
/// server's rejection message.
pub async fn change_password<S, T>(
    store: SessionSignal<S>,
    auth: &AuthClient<T>,
    old_password: &str,
    new_password: &str,
) -> Result<(), ApiError>
where
    S: KeyValueStorage + Send + Sync + 'static,
    T: HttpTransport,
{
    let token = require_token(store)?;
    auth.change_password(&token, old_password, new_password).await
}
