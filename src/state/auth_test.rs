use futures::executor::block_on;
use leptos::reactive::owner::Owner;
use serde_json::json;

use super::*;
use crate::config::ApiConfig;
use crate::net::mock_transport::MockTransport;
use crate::net::types::Role;
use crate::util::storage::MemoryStorage;

fn client(transport: MockTransport) -> AuthClient<MockTransport> {
    AuthClient::new(ApiConfig::new("https://api.example.test").unwrap(), transport)
}

fn hydrated_signal() -> SessionSignal<MemoryStorage> {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.hydrate();
    RwSignal::new(store)
}

#[test]
fn login_adopts_session() {
    Owner::new().with(|| {
        let store = hydrated_signal();
        let auth = client(MockTransport::new().respond(
            200,
            json!({ "token": "abc", "user": { "username": "root", "role": "admin" } }),
        ));

        let user = block_on(login(store, &auth, "root", "pw")).unwrap();
        assert_eq!(user.role, Role::Admin);
        store.with_untracked(|s| {
            assert_eq!(s.session().token(), Some("abc"));
            assert!(s.session().is_admin);
        });
    });
}

#[test]
fn failed_login_leaves_session_alone() {
    Owner::new().with(|| {
        let store = hydrated_signal();
        let auth = client(MockTransport::new().respond(401, json!({ "message": "Invalid credentials" })));

        let err = block_on(login(store, &auth, "root", "bad")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(require_token(store), Err(ApiError::Unauthorized("Not authenticated".to_owned())));
    });
}

#[test]
fn check_auth_clears_on_rejection_and_logout_is_local() {
    Owner::new().with(|| {
        let store = hydrated_signal();
        let auth = client(
            MockTransport::new()
                .respond(200, json!({ "token": "abc", "user": { "username": "alice", "role": "user" } }))
                .respond(200, json!({ "valid": true }))
                .respond(401, json!({})),
        );

        block_on(login(store, &auth, "alice", "pw")).unwrap();
        assert!(block_on(check_auth(store, &auth)));
        assert_eq!(require_token(store).unwrap(), "abc");

        assert!(!block_on(check_auth(store, &auth)));
        assert!(require_token(store).is_err());

        logout(store);
        assert_eq!(auth.transport().requests().len(), 3);
    });
}

#[test]
fn change_password_requires_session() {
    Owner::new().with(|| {
        let store = hydrated_signal();
        let auth = client(MockTransport::new());
        let err = block_on(change_password(store, &auth, "old", "newpassword")).unwrap_err();
        assert!(err.is_auth_failure());
        assert!(auth.transport().requests().is_empty());
    });
}

#[test]
fn change_password_sends_current_token() {
    Owner::new().with(|| {
        let store = hydrated_signal();
        store.update(|s| {
            s.set_auth("abc".to_owned(), AuthUser { username: "alice".to_owned(), role: Role::User, email: None });
        });
        let auth = client(MockTransport::new().respond(200, json!({ "success": true })));

        block_on(change_password(store, &auth, "old", "newpassword")).unwrap();
        assert_eq!(auth.transport().last_request().bearer.as_deref(), Some("abc"));
    });
}
