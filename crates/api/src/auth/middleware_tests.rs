//! Tests for the bearer-token verification state machine
#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::jwt::JwtManager;
use super::middleware::{check_super_admin, verify_bearer, AuthError};
use crate::error::ApiError;
use treadstock_shared::AdminRole;

const SECRET: &str = "test-secret-key-at-least-32-chars!";

fn manager() -> JwtManager {
    JwtManager::new(SECRET, 24)
}

/// Sign arbitrary claims with the test secret
fn token_with(claims: serde_json::Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn future_exp() -> i64 {
    (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp()
}

#[test]
fn test_missing_header() {
    let jwt = manager();
    let result = verify_bearer(None, Some(&jwt));
    assert_eq!(result.unwrap_err(), AuthError::MissingHeader);
    assert_eq!(AuthError::MissingHeader.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_scheme_without_token() {
    let jwt = manager();
    let result = verify_bearer(Some("Bearer"), Some(&jwt));
    assert_eq!(result.unwrap_err(), AuthError::InvalidFormat);
    assert_eq!(AuthError::InvalidFormat.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_lowercase_scheme_rejected() {
    let jwt = manager();
    let token = jwt.generate_token(Uuid::new_v4(), "a@example.com").unwrap();
    // The scheme match is case-sensitive
    let result = verify_bearer(Some(&format!("bearer {}", token)), Some(&jwt));
    assert_eq!(result.unwrap_err(), AuthError::InvalidFormat);
}

#[test]
fn test_extra_parts_rejected() {
    let jwt = manager();
    let result = verify_bearer(Some("Bearer abc def"), Some(&jwt));
    assert_eq!(result.unwrap_err(), AuthError::InvalidFormat);
}

#[test]
fn test_empty_header_rejected() {
    let jwt = manager();
    let result = verify_bearer(Some(""), Some(&jwt));
    assert_eq!(result.unwrap_err(), AuthError::InvalidFormat);
}

#[test]
fn test_missing_verifier_is_configuration_fault() {
    // Well-formed request, but no signing secret in the process
    let result = verify_bearer(Some("Bearer sometoken"), None);
    assert_eq!(result.unwrap_err(), AuthError::NotConfigured);
    assert_eq!(
        AuthError::NotConfigured.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_format_checked_before_configuration() {
    // A malformed header is the client's fault even when the server is
    // misconfigured; the state machine ordering pins this down.
    let result = verify_bearer(Some("Bearer"), None);
    assert_eq!(result.unwrap_err(), AuthError::InvalidFormat);
}

#[test]
fn test_garbage_token() {
    let jwt = manager();
    let result = verify_bearer(Some("Bearer not-a-real-token"), Some(&jwt));
    assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    assert_eq!(AuthError::InvalidToken.status(), StatusCode::FORBIDDEN);
}

#[test]
fn test_wrong_signature() {
    let jwt = manager();
    let other = JwtManager::new("a-completely-different-32-char-secret!!", 24);
    let token = other
        .generate_token(Uuid::new_v4(), "a@example.com")
        .unwrap();
    let result = verify_bearer(Some(&format!("Bearer {}", token)), Some(&jwt));
    assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
}

#[test]
fn test_expired_token() {
    let jwt = manager();
    let now = OffsetDateTime::now_utc();
    let token = token_with(serde_json::json!({
        "sub": Uuid::new_v4().to_string(),
        "email": "a@example.com",
        "iat": (now - Duration::hours(3)).unix_timestamp(),
        "exp": (now - Duration::hours(2)).unix_timestamp(),
    }));

    let result = verify_bearer(Some(&format!("Bearer {}", token)), Some(&jwt));
    assert_eq!(result.unwrap_err(), AuthError::Expired);
    assert_eq!(AuthError::Expired.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_payload_missing_id() {
    let jwt = manager();
    let token = token_with(serde_json::json!({
        "email": "a@example.com",
        "exp": future_exp(),
    }));

    let result = verify_bearer(Some(&format!("Bearer {}", token)), Some(&jwt));
    assert_eq!(result.unwrap_err(), AuthError::InvalidPayload);
    assert_eq!(AuthError::InvalidPayload.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_payload_missing_email() {
    let jwt = manager();
    let token = token_with(serde_json::json!({
        "sub": Uuid::new_v4().to_string(),
        "exp": future_exp(),
    }));

    let result = verify_bearer(Some(&format!("Bearer {}", token)), Some(&jwt));
    assert_eq!(result.unwrap_err(), AuthError::InvalidPayload);
}

#[test]
fn test_payload_empty_email() {
    let jwt = manager();
    let token = token_with(serde_json::json!({
        "sub": Uuid::new_v4().to_string(),
        "email": "",
        "exp": future_exp(),
    }));

    let result = verify_bearer(Some(&format!("Bearer {}", token)), Some(&jwt));
    assert_eq!(result.unwrap_err(), AuthError::InvalidPayload);
}

#[test]
fn test_payload_non_string_claims() {
    let jwt = manager();
    let token = token_with(serde_json::json!({
        "sub": 12345,
        "email": "a@example.com",
        "exp": future_exp(),
    }));

    let result = verify_bearer(Some(&format!("Bearer {}", token)), Some(&jwt));
    assert_eq!(result.unwrap_err(), AuthError::InvalidPayload);
}

#[test]
fn test_valid_token_attaches_identity() {
    let jwt = manager();
    let admin_id = Uuid::new_v4();
    let token = jwt.generate_token(admin_id, "ops@example.com").unwrap();

    let admin = verify_bearer(Some(&format!("Bearer {}", token)), Some(&jwt)).unwrap();
    assert_eq!(admin.id, admin_id);
    assert_eq!(admin.email, "ops@example.com");
}

#[test]
fn test_super_admin_gate() {
    // No account behind the authenticated id
    assert!(matches!(check_super_admin(None), Err(ApiError::NotFound)));

    // Plain admin is not enough
    assert!(matches!(
        check_super_admin(Some(AdminRole::Admin)),
        Err(ApiError::Forbidden)
    ));

    assert!(check_super_admin(Some(AdminRole::SuperAdmin)).is_ok());
}
