//! Request authentication middleware
//!
//! Verifies bearer tokens on incoming requests and attaches the caller's
//! identity to the request. Verification walks an ordered state machine so
//! each failure cause maps to a distinct status code: missing header and
//! format violations (401) before the configuration fault (500), before
//! cryptographic failures (403), before expiry and payload problems (401).

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

use super::jwt::{JwtError, JwtManager};
use treadstock_shared::AdminRole;

/// The expected authorization scheme, matched case-sensitively
const BEARER_SCHEME: &str = "Bearer";

/// Authenticated admin identity attached to request extensions
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub id: Uuid,
    pub email: String,
}

/// State handed to the auth middleware
///
/// `jwt` is absent when no signing secret is configured; protected requests
/// then fail with a configuration fault rather than an auth failure.
#[derive(Clone)]
pub struct AuthState {
    pub jwt: Option<JwtManager>,
    pub pool: PgPool,
}

/// Authentication failures, in state-machine order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,
    #[error("Invalid authorization format. Expected: Bearer <token>")]
    InvalidFormat,
    #[error("Server configuration error")]
    NotConfigured,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    Expired,
    #[error("Invalid token payload")]
    InvalidPayload,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader => StatusCode::UNAUTHORIZED,
            AuthError::InvalidFormat => StatusCode::UNAUTHORIZED,
            AuthError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InvalidToken => StatusCode::FORBIDDEN,
            AuthError::Expired => StatusCode::UNAUTHORIZED,
            AuthError::InvalidPayload => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Verify an `Authorization` header value against the configured verifier
///
/// Pure function implementing the full verification state machine; the axum
/// middleware below is a thin wrapper around it.
pub fn verify_bearer(
    header: Option<&str>,
    jwt: Option<&JwtManager>,
) -> Result<AuthAdmin, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;

    let mut parts = header.split_whitespace();
    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return Err(AuthError::InvalidFormat),
    };

    if scheme != BEARER_SCHEME {
        return Err(AuthError::InvalidFormat);
    }

    let jwt = jwt.ok_or(AuthError::NotConfigured)?;

    let claims = jwt.validate_token(token).map_err(|e| match e {
        JwtError::Expired => AuthError::Expired,
        _ => AuthError::InvalidToken,
    })?;

    // A well-signed token can still carry an unusable payload
    let id = claims
        .sub
        .as_str()
        .filter(|s| !s.is_empty())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(AuthError::InvalidPayload)?;

    let email = claims
        .email
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or(AuthError::InvalidPayload)?
        .to_string();

    Ok(AuthAdmin { id, email })
}

/// Middleware requiring a valid bearer token
///
/// On success the caller's `AuthAdmin` identity is inserted into request
/// extensions for handlers and downstream middleware.
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = match request.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::InvalidFormat)?),
        None => None,
    };

    let admin = verify_bearer(header, state.jwt.as_ref())?;

    tracing::debug!(admin_id = %admin.id, "Request authenticated");

    request.extensions_mut().insert(admin);
    Ok(next.run(request).await)
}

/// Middleware requiring the authenticated admin to be a super admin
///
/// Layered after [`require_auth`]: a capability check over the stored role,
/// not a role hierarchy. Loads the account fresh so a demoted or deleted
/// admin loses access immediately rather than at token expiry.
pub async fn require_super_admin(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(admin) = request.extensions().get::<AuthAdmin>().cloned() else {
        return Err(ApiError::Unauthorized);
    };

    let role: Option<AdminRole> =
        sqlx::query_scalar("SELECT role FROM admin_accounts WHERE id = $1")
            .bind(admin.id)
            .fetch_optional(&state.pool)
            .await?;

    if role.is_none() {
        tracing::warn!(admin_id = %admin.id, "Authenticated admin no longer exists");
    }

    check_super_admin(role)?;
    Ok(next.run(request).await)
}

/// Check a super-admin gate against an already-loaded role
///
/// Extracted so the decision itself is testable without a database.
pub fn check_super_admin(role: Option<AdminRole>) -> Result<(), ApiError> {
    match role {
        None => Err(ApiError::NotFound),
        Some(role) if !role.is_super_admin() => Err(ApiError::Forbidden),
        Some(_) => Ok(()),
    }
}
