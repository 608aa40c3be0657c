use super::*;

#[test]
fn from_status_maps_401_and_403_to_unauthorized() {
    assert_eq!(
        ApiError::from_status(401, "Invalid credentials"),
        ApiError::Unauthorized("Invalid credentials".to_owned())
    );
    assert!(ApiError::from_status(403, "nope").is_auth_failure());
}

#[test]
fn from_status_keeps_other_statuses_as_remote() {
    let err = ApiError::from_status(409, "Username already exists");
    assert_eq!(err, ApiError::Remote { status: 409, message: "Username already exists".to_owned() });
    assert!(!err.is_auth_failure());
}

#[test]
fn display_shows_server_message_verbatim() {
    let err = ApiError::from_status(400, "Current password is incorrect");
    assert_eq!(err.to_string(), "Current password is incorrect");
}

#[test]
fn display_prefixes_transport_failures() {
    assert_eq!(ApiError::Transport("offline".to_owned()).to_string(), "network error: offline");
}

#[test]
fn serde_errors_become_parse_errors() {
    let err: ApiError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, ApiError::Parse(_)));
}
