use super::*;
use crate::services::account::Role;

fn keys() -> TokenKeys {
    TokenKeys::new("test-signing-secret")
}

#[test]
fn issue_and_verify_round_trip() {
    let keys = keys();
    let user_id = Uuid::new_v4();

    let token = issue(&keys, user_id, Role::User).expect("issue should succeed");
    assert!(!token.is_empty());

    let identity = verify(&keys, &token).expect("verify should succeed");
    assert_eq!(identity.id, user_id);
    assert_eq!(identity.role, Role::User);
}

#[test]
fn issued_token_carries_admin_role() {
    let keys = keys();
    let token = issue(&keys, Uuid::new_v4(), Role::Admin).unwrap();
    let identity = verify(&keys, &token).unwrap();
    assert_eq!(identity.role, Role::Admin);
}

#[test]
fn verify_rejects_garbage() {
    let keys = keys();
    assert!(verify(&keys, "not.a.token").is_err());
    assert!(verify(&keys, "").is_err());
}

#[test]
fn verify_rejects_token_signed_with_other_secret() {
    let ours = keys();
    let theirs = TokenKeys::new("some-other-secret");

    let token = issue(&theirs, Uuid::new_v4(), Role::User).unwrap();
    assert!(verify(&ours, &token).is_err());
}

#[test]
fn verify_rejects_expired_token() {
    let keys = keys();
    // Past the default validation leeway.
    let token = issue_with_ttl(&keys, Uuid::new_v4(), Role::User, Duration::days(-1)).unwrap();
    assert!(verify(&keys, &token).is_err());
}

#[test]
fn claims_serialize_role_as_wire_string() {
    let claims = Claims { sub: Uuid::nil(), role: Role::Admin, exp: 0 };
    let value = serde_json::to_value(&claims).unwrap();
    assert_eq!(value.get("role").and_then(|v| v.as_str()), Some("admin"));
}
