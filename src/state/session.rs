//! Persisted authentication session: hydration, migration, verification.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionStore` exists per browser profile. `App` hydrates it once at
//! startup and provides it through context; guards read its derived flags and
//! call `check_auth` on protected-route entry.
//!
//! DESIGN
//! ======
//! - The persisted record lives under a single storage key and carries a
//!   schema version. `migrate` is a pure function over the decoded JSON so it
//!   can be tested without storage.
//! - Every mutation writes through to storage. Storage failures are logged
//!   and never surface to callers; the in-memory session stays authoritative.
//! - `check_auth` is split into `verify_session_token` (the network leg) and
//!   `apply_verification` (the synchronous state transition) so reactive
//!   callers never hold a borrow across an await point.
//!
//! ERROR HANDLING
//! ==============
//! Verification fails closed: a rejected token, a transport failure, and an
//! unavailable verifier all clear the session and report `false`.
//!
//! TRADE-OFFS
//! ==========
//! A verdict only clears the session when the store still holds the token
//! that was verified. A slow check that loses a race with a fresh login
//! leaves the new session alone.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::net::error::ApiError;
use crate::net::types::{AuthUser, Role};
use crate::util::storage::{BrowserStorage, KeyValueStorage, save_json};

/// Storage key holding the persisted session record.
pub const STORAGE_KEY: &str = "auth-storage";

/// Current persisted schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Remote check of whether a bearer token is still accepted.
#[async_trait(?Send)]
pub trait TokenVerifier {
    /// `Ok(true)` for an accepted token, `Ok(false)` for a rejected one.
    async fn verify_token(&self, token: &str) -> Result<bool, ApiError>;
}

/// In-memory view of the authenticated session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub has_hydrated: bool,
}

impl Session {
    fn authenticated(token: String, user: AuthUser) -> Self {
        let is_admin = user.is_admin();
        Self { token: Some(token), user: Some(user), is_authenticated: true, is_admin, has_hydrated: false }
    }

    /// Re-derive the flags that must agree with `token` and `user`.
    fn normalized(mut self) -> Self {
        self.is_admin = self.user.as_ref().is_some_and(AuthUser::is_admin);
        self.is_authenticated = self.is_authenticated && self.token.is_some() && self.user.is_some();
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

#[derive(Serialize)]
struct PersistedRecord<'a> {
    #[serde(flatten)]
    session: &'a Session,
    version: u32,
}

/// `token` is a string or null and `user` is an object or null.
fn has_session_shape(record: &Value) -> bool {
    let Some(fields) = record.as_object() else {
        return false;
    };
    let token_ok = fields.get("token").is_none_or(|t| t.is_string() || t.is_null());
    // Arrays pass too: older writers only checked for a non-primitive.
    let user_ok = fields.get("user").is_none_or(|u| u.is_object() || u.is_array() || u.is_null());
    token_ok && user_ok
}

fn decode(record: Value) -> Option<Session> {
    match serde_json::from_value::<Session>(record) {
        Ok(session) => Some(session.normalized()),
        Err(e) => {
            log::warn!("persisted session does not decode: {e}");
            None
        }
    }
}

/// Profile fields read one by one from an older record. Missing or unknown
/// values fall back to an empty username and the `user` role. Arrays carry
/// no profile.
fn legacy_user(value: &Value) -> Option<AuthUser> {
    let fields = value.as_object()?;
    let text = |key: &str| fields.get(key).and_then(Value::as_str);
    Some(AuthUser {
        username: text("username").unwrap_or_default().to_owned(),
        role: if text("role") == Some(Role::Admin.as_str()) { Role::Admin } else { Role::User },
        email: text("email").map(str::to_owned),
    })
}

/// Bring a persisted record written at `version` up to the current schema.
///
/// Older records with a valid shape keep their token and user and come back
/// with `has_hydrated` unset. Anything else yields the empty session.
pub fn migrate(record: Value, version: u32) -> Session {
    if version >= SCHEMA_VERSION {
        return decode(record).unwrap_or_default();
    }
    if !has_session_shape(&record) {
        log::warn!("discarding persisted session v{version}: unexpected shape");
        return Session::default();
    }
    log::info!("migrating persisted session v{version} -> v{SCHEMA_VERSION}");
    let token = record.get("token").and_then(Value::as_str).map(str::to_owned);
    let user = record.get("user").and_then(legacy_user);
    let is_authenticated = record.get("isAuthenticated").and_then(Value::as_bool).unwrap_or(false);
    Session { token, user, is_authenticated, is_admin: false, has_hydrated: false }.normalized()
}

/// Result of the network leg of `check_auth`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verification {
    /// No token was held, so no request was made.
    NoToken,
    Valid,
    Rejected,
    Failed(ApiError),
}

impl Verification {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Ask `verifier` about `token` without touching any session state.
pub async fn verify_session_token<V>(token: Option<&str>, verifier: &V) -> Verification
where
    V: TokenVerifier + ?Sized,
{
    let Some(token) = token else {
        return Verification::NoToken;
    };
    match verifier.verify_token(token).await {
        Ok(true) => Verification::Valid,
        Ok(false) => Verification::Rejected,
        Err(e) => Verification::Failed(e),
    }
}

/// Owner of the session and its persisted record.
#[derive(Clone, Debug)]
pub struct SessionStore<S = BrowserStorage> {
    storage: S,
    session: Session,
}

impl<S: KeyValueStorage> SessionStore<S> {
    /// An unhydrated store over `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage, session: Session::default() }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn has_hydrated(&self) -> bool {
        self.session.has_hydrated
    }

    /// Load, migrate, and adopt the persisted record, then mark hydrated.
    pub fn hydrate(&mut self) {
        let restored = match self.storage.get_item(STORAGE_KEY) {
            None => Session::default(),
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(record) => {
                    let version = record
                        .get("version")
                        .and_then(Value::as_u64)
                        .and_then(|v| u32::try_from(v).ok())
                        .unwrap_or(0);
                    migrate(record, version)
                }
                Err(e) => {
                    log::warn!("persisted session is not valid JSON: {e}");
                    Session::default()
                }
            },
        };
        self.session = Session { has_hydrated: true, ..restored };
        log::debug!("session hydrated: authenticated={}", self.session.is_authenticated);
        self.persist();
    }

    /// Adopt a freshly issued token and profile.
    pub fn set_auth(&mut self, token: String, user: AuthUser) {
        let has_hydrated = self.session.has_hydrated;
        self.session = Session { has_hydrated, ..Session::authenticated(token, user) };
        self.persist();
    }

    /// Drop token and profile. Hydration status is kept.
    pub fn clear_auth(&mut self) {
        self.session = Session { has_hydrated: self.session.has_hydrated, ..Session::default() };
        self.persist();
    }

    /// Apply the verdict for `verified_token`, returning whether the session
    /// may render protected content.
    pub fn apply_verification(&mut self, verified_token: Option<&str>, outcome: &Verification) -> bool {
        match outcome {
            Verification::Valid => return true,
            Verification::NoToken => {}
            Verification::Rejected => log::info!("session token rejected by server"),
            Verification::Failed(e) => log::warn!("session verification failed: {e}"),
        }
        if self.session.token() == verified_token {
            self.clear_auth();
        } else {
            log::debug!("ignoring verdict for a token that is no longer held");
        }
        false
    }

    /// Verify the held token remotely, clearing the session on any failure.
    pub async fn check_auth<V>(&mut self, verifier: &V) -> bool
    where
        V: TokenVerifier + ?Sized,
    {
        let token = self.session.token.clone();
        let outcome = verify_session_token(token.as_deref(), verifier).await;
        self.apply_verification(token.as_deref(), &outcome)
    }

    fn persist(&self) {
        let record = PersistedRecord { session: &self.session, version: SCHEMA_VERSION };
        if let Err(e) = save_json(&self.storage, STORAGE_KEY, &record) {
            log::warn!("failed to persist session: {e}");
        }
    }
}
