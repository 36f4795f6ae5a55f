//! Admin authentication routes

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        middleware::AuthAdmin,
        reset::{cooldown_remaining, ResetTokenError, ResetTokenManager, ResetValidation},
        validate_password_strength, verify_password,
    },
    error::{ApiError, ApiResult},
    state::AppState,
};

use treadstock_shared::AdminRole;

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ResetTokenValidResponse {
    pub valid: bool,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ResetTokenInvalidResponse {
    pub valid: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AdminProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(Debug, FromRow)]
struct AdminAuthRow {
    id: Uuid,
    email: String,
    password_hash: String,
}

#[derive(Debug, FromRow)]
struct ResetRequestRow {
    id: Uuid,
    email: String,
    last_reset_request_at: Option<OffsetDateTime>,
}

#[derive(Debug, FromRow)]
struct AdminProfileRow {
    id: Uuid,
    email: String,
    name: String,
    role: AdminRole,
}

// =============================================================================
// Helpers
// =============================================================================

/// Normalize an email for lookup: trimmed and lowercased
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal shape check for an email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.len() > 254 || email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

// =============================================================================
// Handlers
// =============================================================================

/// Log in with email and password
///
/// Failures are a single generic 401 regardless of whether the email exists,
/// so login cannot be used to probe for accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let email = normalize_email(&req.email);

    let admin: AdminAuthRow = sqlx::query_as(
        r#"
        SELECT id, email, password_hash
        FROM admin_accounts
        WHERE email = $1
        "#,
    )
    .bind(&email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| {
        tracing::warn!("login: no account for presented email");
        ApiError::InvalidCredentials
    })?;

    let valid = verify_password(&req.password, &admin.password_hash).map_err(|e| {
        tracing::error!(error = ?e, "login: password verification failed");
        ApiError::Internal
    })?;

    if !valid {
        tracing::warn!(admin_id = %admin.id, "login: invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let jwt = state.jwt.as_ref().ok_or(ApiError::ServerConfiguration)?;
    let token = jwt.generate_token(admin.id, &admin.email).map_err(|e| {
        tracing::error!(error = ?e, "login: token generation failed");
        ApiError::Internal
    })?;

    tracing::info!(admin_id = %admin.id, "login: successful");

    Ok(Json(LoginResponse { token }))
}

/// Request a password reset link
///
/// The response is identical whether or not the email is registered, so the
/// endpoint cannot be used to enumerate accounts. For registered accounts a
/// per-account cooldown bounds how often new tokens can be minted.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if !is_valid_email(&req.email) {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    let email = normalize_email(&req.email);
    let now = OffsetDateTime::now_utc();

    let account: Option<ResetRequestRow> = sqlx::query_as(
        r#"
        SELECT id, email, last_reset_request_at
        FROM admin_accounts
        WHERE email = $1
        "#,
    )
    .bind(&email)
    .fetch_optional(&state.pool)
    .await?;

    if let Some(account) = account {
        if let Some(remaining) = cooldown_remaining(account.last_reset_request_at, now) {
            tracing::warn!(admin_id = %account.id, "forgot_password: cooldown active");
            return Err(ApiError::TooManyRequests(format!(
                "Too many password reset requests. Please try again in {} seconds.",
                remaining.whole_seconds().max(1)
            )));
        }

        // The hashed token is committed before the email goes out; a failed
        // delivery does not undo issuance.
        let manager = ResetTokenManager::new(state.pool.clone());
        let reset_token = manager.issue(account.id, now).await?;

        let email_service = state.email.clone();
        let recipient = account.email.clone();
        tokio::spawn(async move {
            email_service
                .send_password_reset(&recipient, &reset_token)
                .await;
        });
    }

    Ok(Json(MessageResponse {
        message: "If an account exists with this email, a password reset link has been sent."
            .to_string(),
    }))
}

/// Check a reset token before showing the new-password form
///
/// Counts as a validation attempt against the token's ceiling.
pub async fn verify_reset_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Response> {
    let manager = ResetTokenManager::new(state.pool.clone());
    let now = OffsetDateTime::now_utc();

    let response = match manager.validate(&token, now).await? {
        ResetValidation::Valid { email, .. } => (
            StatusCode::OK,
            Json(ResetTokenValidResponse { valid: true, email }),
        )
            .into_response(),
        ResetValidation::Invalid => (
            StatusCode::BAD_REQUEST,
            Json(ResetTokenInvalidResponse {
                valid: false,
                message: "Invalid or expired reset token".to_string(),
            }),
        )
            .into_response(),
        ResetValidation::AttemptsExceeded => (
            StatusCode::BAD_REQUEST,
            Json(ResetTokenInvalidResponse {
                valid: false,
                message: "Maximum reset attempts exceeded. Please request a new reset link."
                    .to_string(),
            }),
        )
            .into_response(),
    };

    Ok(response)
}

/// Redeem a reset token and set a new password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    validate_password_strength(&req.password).map_err(|e| ApiError::Validation(e.to_string()))?;

    let manager = ResetTokenManager::new(state.pool.clone());
    let now = OffsetDateTime::now_utc();

    let admin_id = manager
        .redeem(&req.token, &req.password, now)
        .await
        .map_err(|e| match e {
            ResetTokenError::Invalid => ApiError::InvalidResetToken,
            ResetTokenError::AttemptsExceeded => ApiError::ResetAttemptsExceeded,
            ResetTokenError::Hashing(msg) => {
                tracing::error!(error = %msg, "reset_password: hashing failed");
                ApiError::Internal
            }
            ResetTokenError::Database(err) => err.into(),
        })?;

    // Best-effort notification that the credential changed
    let admin_email: Option<String> =
        sqlx::query_scalar("SELECT email FROM admin_accounts WHERE id = $1")
            .bind(admin_id)
            .fetch_optional(&state.pool)
            .await?;

    if let Some(admin_email) = admin_email {
        let email_service = state.email.clone();
        tokio::spawn(async move {
            email_service.send_password_changed(&admin_email).await;
        });
    }

    Ok(Json(MessageResponse {
        message: "Password has been successfully reset.".to_string(),
    }))
}

/// Profile of the authenticated admin
pub async fn me(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthAdmin>,
) -> ApiResult<Json<AdminProfileResponse>> {
    let profile: AdminProfileRow = sqlx::query_as(
        r#"
        SELECT id, email, name, role
        FROM admin_accounts
        WHERE id = $1
        "#,
    )
    .bind(admin.id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(AdminProfileResponse {
        id: profile.id,
        email: profile.email,
        name: profile.name,
        role: profile.role,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Admin@Example.COM "), "admin@example.com");
        assert_eq!(normalize_email("plain@example.com"), "plain@example.com");
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("admin@example.com"));
        assert!(is_valid_email("  admin@example.com  "));
        assert!(is_valid_email("first.last@sub.example.co"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("admin@nodot"));
        assert!(!is_valid_email("admin@.example.com"));
        assert!(!is_valid_email("two words@example.com"));
    }
}
