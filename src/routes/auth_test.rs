use super::*;
use crate::services::account::AccountError;

#[test]
fn parse_bearer_extracts_token() {
    assert_eq!(parse_bearer(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    assert_eq!(parse_bearer(Some("  Bearer abc ")), Some("abc"));
}

#[test]
fn parse_bearer_rejects_missing_or_malformed_headers() {
    assert_eq!(parse_bearer(None), None);
    assert_eq!(parse_bearer(Some("")), None);
    assert_eq!(parse_bearer(Some("abc.def.ghi")), None);
    assert_eq!(parse_bearer(Some("Basic abc")), None);
    assert_eq!(parse_bearer(Some("Bearer ")), None);
    assert_eq!(parse_bearer(Some("Bearer")), None);
}

#[test]
fn ensure_admin_passes_admin_through() {
    let identity = Identity { id: Uuid::new_v4(), role: Role::Admin };
    assert!(ensure_admin(identity).is_ok());
}

#[test]
fn ensure_admin_rejects_user_role_with_message() {
    let identity = Identity { id: Uuid::new_v4(), role: Role::User };
    let err = ensure_admin(identity).expect_err("user role should be rejected");
    assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    assert_eq!(err.message(), "Not authorized to access this route: Role 'user' is not allowed.");
}

#[test]
fn account_errors_map_to_expected_responses() {
    use axum::http::StatusCode;

    let taken = account_error_to_api(AccountError::EmailTaken, "Server Error during registration");
    assert_eq!(taken.status(), StatusCode::BAD_REQUEST);
    assert_eq!(taken.message(), "User already exists");

    let bad_creds = account_error_to_api(AccountError::InvalidCredentials, "Server Error during login");
    assert_eq!(bad_creds.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(bad_creds.message(), "Invalid credentials");

    let bad_email = account_error_to_api(AccountError::InvalidEmail, "Server Error during registration");
    assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);

    let db = account_error_to_api(AccountError::Db(sqlx::Error::PoolClosed), "Server Error during login");
    assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(db.message(), "Server Error during login");
}

#[test]
fn auth_response_uses_mongo_style_id_key() {
    let response = AuthResponse {
        id: Uuid::nil(),
        name: "Asha".into(),
        email: "asha@example.com".into(),
        role: Role::User,
        token: "signed".into(),
    };

    let value = serde_json::to_value(&response).unwrap();
    assert!(value.get("_id").is_some());
    assert!(value.get("id").is_none());
    assert_eq!(value.get("role"), Some(&serde_json::json!("user")));
    assert_eq!(value.get("token"), Some(&serde_json::json!("signed")));
}
