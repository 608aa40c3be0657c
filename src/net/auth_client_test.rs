use futures::executor::block_on;
use serde_json::json;

use super::*;
use crate::net::mock_transport::MockTransport;
use crate::net::types::Role;

fn client(transport: MockTransport) -> AuthClient<MockTransport> {
    AuthClient::new(ApiConfig::new("https://api.example.test/").unwrap(), transport)
}

// =============================================================
// login
// =============================================================

#[test]
fn login_posts_credentials_and_decodes_session() {
    let auth = client(MockTransport::new().respond(
        200,
        json!({ "token": "abc", "user": { "username": "alice", "role": "user" } }),
    ));

    let resp = block_on(auth.login("alice", "pw")).unwrap();
    assert_eq!(resp.token, "abc");
    assert_eq!(resp.user.role, Role::User);

    let req = auth.transport().last_request();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, "https://api.example.test/auth/login");
    assert_eq!(req.bearer, None);
    assert_eq!(req.body, Some(json!({ "username": "alice", "password": "pw" })));
}

#[test]
fn login_rejection_surfaces_server_message() {
    let auth = client(MockTransport::new().respond(401, json!({ "message": "Invalid username or password" })));
    let err = block_on(auth.login("alice", "bad")).unwrap_err();
    assert_eq!(err, ApiError::Unauthorized("Invalid username or password".to_owned()));
}

#[test]
fn login_without_error_body_uses_default_message() {
    let auth = client(MockTransport::new().respond_text(502, ""));
    let err = block_on(auth.login("alice", "pw")).unwrap_err();
    assert_eq!(err.to_string(), "Login failed");
}

#[test]
fn login_with_malformed_success_body_is_parse_error() {
    let auth = client(MockTransport::new().respond(200, json!({ "token": "abc" })));
    let err = block_on(auth.login("alice", "pw")).unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

// =============================================================
// verify
// =============================================================

#[test]
fn verify_sends_bearer_and_reports_2xx_as_valid() {
    let auth = client(MockTransport::new().respond(200, json!({ "valid": true })));
    assert_eq!(block_on(auth.verify("abc")), Ok(true));
    let req = auth.transport().last_request();
    assert_eq!(req.url, "https://api.example.test/auth/verify");
    assert_eq!(req.bearer.as_deref(), Some("abc"));
}

#[test]
fn verify_reports_non_2xx_as_invalid() {
    let auth = client(MockTransport::new().respond_text(401, ""));
    assert_eq!(block_on(auth.verify("abc")), Ok(false));
}

#[test]
fn verify_propagates_transport_failure() {
    let auth = client(MockTransport::new().fail(ApiError::Transport("offline".to_owned())));
    assert_eq!(block_on(auth.verify("abc")), Err(ApiError::Transport("offline".to_owned())));
}

// =============================================================
// profile + password
// =============================================================

#[test]
fn current_user_decodes_profile() {
    let auth = client(MockTransport::new().respond(
        200,
        json!({ "username": "root", "role": "admin", "email": "root@example.test" }),
    ));
    let user = block_on(auth.current_user("tok")).unwrap();
    assert!(user.is_admin());
    assert_eq!(user.email.as_deref(), Some("root@example.test"));
    assert_eq!(auth.transport().last_request().method, Method::Get);
}

#[test]
fn change_password_sends_camel_case_body() {
    let auth = client(MockTransport::new().respond(200, json!({ "success": true })));
    block_on(auth.change_password("tok", "old-pw", "new-password")).unwrap();
    let req = auth.transport().last_request();
    assert_eq!(req.url, "https://api.example.test/auth/change-password");
    assert_eq!(req.bearer.as_deref(), Some("tok"));
    assert_eq!(req.body, Some(json!({ "oldPassword": "old-pw", "newPassword": "new-password" })));
}

#[test]
fn change_password_failure_uses_server_message() {
    let auth = client(MockTransport::new().respond(400, json!({ "message": "Current password is incorrect" })));
    let err = block_on(auth.change_password("tok", "wrong", "new-password")).unwrap_err();
    assert_eq!(err.to_string(), "Current password is incorrect");
}

#[test]
fn token_verifier_impl_delegates_to_verify() {
    let auth = client(MockTransport::new().respond_text(204, ""));
    assert_eq!(block_on(TokenVerifier::verify_token(&auth, "abc")), Ok(true));
}
