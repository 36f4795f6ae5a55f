//! Password reset tokens
//!
//! Single-use, time-limited reset tokens for the admin password-reset flow.
//! Only a SHA-256 hash of a token is ever stored, directly on the admin
//! account row, so re-issuing overwrites the previous token in one statement
//! and only the newest link works.

use sha2::{Digest, Sha256};
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::password::{hash_password, PasswordError};

/// How long an issued reset token stays valid
pub const RESET_TOKEN_TTL: Duration = Duration::hours(1);

/// Minimum interval between reset requests for the same account
pub const RESET_REQUEST_COOLDOWN: Duration = Duration::minutes(20);

/// Validation attempts a single token tolerates
pub const MAX_RESET_ATTEMPTS: i32 = 5;

/// Generate a secure random token
///
/// Returns a 32-byte hex-encoded token (64 characters)
pub fn generate_token() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}

/// Hash a token using SHA-256
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Time left on the per-account cooldown, if it is still active
pub fn cooldown_remaining(
    last_request: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> Option<Duration> {
    let last = last_request?;
    let elapsed = now - last;
    if elapsed < RESET_REQUEST_COOLDOWN {
        Some(RESET_REQUEST_COOLDOWN - elapsed)
    } else {
        None
    }
}

/// Check whether a stored expiry has passed
fn token_expired(expires_at: Option<OffsetDateTime>, now: OffsetDateTime) -> bool {
    expires_at.map_or(true, |at| now > at)
}

/// Outcome of validating a presented reset token
#[derive(Debug)]
pub enum ResetValidation {
    /// Token matches, is unexpired, and is within the attempt ceiling
    Valid { admin_id: Uuid, email: String },
    /// No match, expired, or superseded; indistinguishable to the caller
    Invalid,
    /// Token matched but its attempt ceiling has been reached
    AttemptsExceeded,
}

#[derive(Debug, thiserror::Error)]
pub enum ResetTokenError {
    #[error("Invalid or expired reset token")]
    Invalid,
    #[error("Maximum reset attempts exceeded")]
    AttemptsExceeded,
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

#[derive(sqlx::FromRow)]
struct ResetCandidateRow {
    id: Uuid,
    email: String,
    reset_token_expires_at: Option<OffsetDateTime>,
}

/// Reset token service over the admin account store
pub struct ResetTokenManager {
    pool: PgPool,
}

impl ResetTokenManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Mint a fresh reset token for an account
    ///
    /// Stores the token hash, expiry, a zeroed attempt counter and the
    /// request timestamp in a single statement, superseding any outstanding
    /// token. Returns the plaintext token for out-of-band delivery; the
    /// plaintext is never persisted or logged.
    pub async fn issue(&self, admin_id: Uuid, now: OffsetDateTime) -> Result<String, sqlx::Error> {
        let raw_token = generate_token();
        let token_hash = hash_token(&raw_token);
        let expires_at = now + RESET_TOKEN_TTL;

        sqlx::query(
            r#"
            UPDATE admin_accounts
            SET reset_token_hash = $1,
                reset_token_expires_at = $2,
                reset_attempts = 0,
                last_reset_request_at = $3,
                updated_at = $3
            WHERE id = $4
            "#,
        )
        .bind(&token_hash)
        .bind(expires_at)
        .bind(now)
        .bind(admin_id)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            admin_id = %admin_id,
            expires_at = %expires_at,
            "Password reset token issued"
        );

        Ok(raw_token)
    }

    /// Validate a presented token
    ///
    /// Every call that finds a structurally matching, non-expired token
    /// increments the attempt counter atomically, including the call that
    /// trips the ceiling; a call that matches nothing increments nothing.
    /// The ceiling check runs against the incremented value, so the token
    /// survives exactly `MAX_RESET_ATTEMPTS` validations.
    pub async fn validate(
        &self,
        raw_token: &str,
        now: OffsetDateTime,
    ) -> Result<ResetValidation, sqlx::Error> {
        let token_hash = hash_token(raw_token);

        let candidate: Option<ResetCandidateRow> = sqlx::query_as(
            r#"
            SELECT id, email, reset_token_expires_at
            FROM admin_accounts
            WHERE reset_token_hash = $1
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await?;

        let Some(candidate) = candidate else {
            return Ok(ResetValidation::Invalid);
        };

        if token_expired(candidate.reset_token_expires_at, now) {
            tracing::warn!(admin_id = %candidate.id, "Expired reset token presented");
            return Ok(ResetValidation::Invalid);
        }

        let attempts: i32 = sqlx::query_scalar(
            r#"
            UPDATE admin_accounts
            SET reset_attempts = reset_attempts + 1,
                updated_at = $1
            WHERE id = $2
            RETURNING reset_attempts
            "#,
        )
        .bind(now)
        .bind(candidate.id)
        .fetch_one(&self.pool)
        .await?;

        if attempts > MAX_RESET_ATTEMPTS {
            tracing::warn!(
                admin_id = %candidate.id,
                attempts,
                "Reset token attempt ceiling reached"
            );
            return Ok(ResetValidation::AttemptsExceeded);
        }

        Ok(ResetValidation::Valid {
            admin_id: candidate.id,
            email: candidate.email,
        })
    }

    /// Redeem a token: replace the password and consume the token
    ///
    /// The credential swap and the token clear happen in one conditional
    /// statement keyed on the stored hash, so a token can be redeemed at
    /// most once even under concurrent redeems.
    pub async fn redeem(
        &self,
        raw_token: &str,
        new_password: &str,
        now: OffsetDateTime,
    ) -> Result<Uuid, ResetTokenError> {
        let admin_id = match self.validate(raw_token, now).await? {
            ResetValidation::Valid { admin_id, .. } => admin_id,
            ResetValidation::Invalid => return Err(ResetTokenError::Invalid),
            ResetValidation::AttemptsExceeded => return Err(ResetTokenError::AttemptsExceeded),
        };

        // Fail closed: no account row is ever written with a plaintext credential
        let password_hash = hash_password(new_password)
            .map_err(|e: PasswordError| ResetTokenError::Hashing(e.to_string()))?;

        let token_hash = hash_token(raw_token);
        let result = sqlx::query(
            r#"
            UPDATE admin_accounts
            SET password_hash = $1,
                reset_token_hash = NULL,
                reset_token_expires_at = NULL,
                reset_attempts = 0,
                updated_at = $2
            WHERE id = $3 AND reset_token_hash = $4
            "#,
        )
        .bind(&password_hash)
        .bind(now)
        .bind(admin_id)
        .bind(&token_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Lost a race against a concurrent redeem or re-issue
            return Err(ResetTokenError::Invalid);
        }

        tracing::info!(admin_id = %admin_id, "Password reset completed");

        Ok(admin_id)
    }
}
