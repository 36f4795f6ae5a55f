//! Admin account management routes
//!
//! Only reachable behind `require_auth` + `require_super_admin`.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{hash_password, middleware::AuthAdmin, validate_password_strength},
    error::{ApiError, ApiResult},
    state::AppState,
};

use treadstock_shared::AdminRole;

use super::auth::is_valid_email;

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Option<AdminRole>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<AdminRole>,
    /// When present the credential is rehashed; otherwise the stored hash is
    /// left untouched.
    pub password: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct AdminAccountResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// List all admin accounts
pub async fn list_accounts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AdminAccountResponse>>> {
    let accounts: Vec<AdminAccountResponse> = sqlx::query_as(
        r#"
        SELECT id, email, name, role, created_at, updated_at
        FROM admin_accounts
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(accounts))
}

/// Provision a new admin account
pub async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> ApiResult<(StatusCode, Json<AdminAccountResponse>)> {
    if !is_valid_email(&req.email) {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Name must not be empty".to_string()));
    }
    validate_password_strength(&req.password).map_err(|e| ApiError::Validation(e.to_string()))?;

    // Fail closed: without a hash there is no insert
    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!(error = ?e, "create_account: hashing failed");
        ApiError::Internal
    })?;

    let account: AdminAccountResponse = sqlx::query_as(
        r#"
        INSERT INTO admin_accounts (email, password_hash, name, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, name, role, created_at, updated_at
        "#,
    )
    .bind(req.email.trim().to_lowercase())
    .bind(&password_hash)
    .bind(req.name.trim())
    .bind(req.role.unwrap_or_default())
    .fetch_one(&state.pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            ApiError::Conflict("An account with this email already exists".to_string())
        }
        _ => e.into(),
    })?;

    tracing::info!(admin_id = %account.id, role = %account.role, "Admin account created");

    Ok((StatusCode::CREATED, Json(account)))
}

/// Field changes to apply to an account row
///
/// `password_hash` is only ever populated from a freshly supplied plaintext;
/// when it is `None` the stored hash is left byte-for-byte unchanged.
#[derive(Debug, Default)]
struct AccountChanges {
    email: Option<String>,
    name: Option<String>,
    role: Option<AdminRole>,
    password_hash: Option<String>,
}

/// Apply changes in a single statement; absent fields keep their value
async fn apply_account_changes(
    pool: &sqlx::PgPool,
    account_id: Uuid,
    changes: AccountChanges,
) -> Result<Option<AdminAccountResponse>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE admin_accounts
        SET email = COALESCE($1, email),
            name = COALESCE($2, name),
            role = COALESCE($3, role),
            password_hash = COALESCE($4, password_hash),
            updated_at = NOW()
        WHERE id = $5
        RETURNING id, email, name, role, created_at, updated_at
        "#,
    )
    .bind(changes.email)
    .bind(changes.name)
    .bind(changes.role)
    .bind(changes.password_hash)
    .bind(account_id)
    .fetch_optional(pool)
    .await
}

/// Update an admin account
///
/// The credential is rehashed only when a new password is supplied; updates
/// that touch other fields leave the stored hash untouched.
pub async fn update_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(req): Json<UpdateAccountRequest>,
) -> ApiResult<Json<AdminAccountResponse>> {
    if let Some(email) = &req.email {
        if !is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }
    }

    let password_hash = match &req.password {
        Some(password) => {
            validate_password_strength(password)
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            Some(hash_password(password).map_err(|e| {
                tracing::error!(error = ?e, "update_account: hashing failed");
                ApiError::Internal
            })?)
        }
        None => None,
    };

    let credential_changed = password_hash.is_some();
    let changes = AccountChanges {
        email: req.email.as_deref().map(|e| e.trim().to_lowercase()),
        name: req.name,
        role: req.role,
        password_hash,
    };

    let account = apply_account_changes(&state.pool, account_id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(
        admin_id = %account.id,
        credential_changed,
        "Admin account updated"
    );

    Ok(Json(account))
}

/// Delete an admin account
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthAdmin>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if caller.id == account_id {
        return Err(ApiError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM admin_accounts WHERE id = $1")
        .bind(account_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }

    tracing::info!(admin_id = %account_id, deleted_by = %caller.id, "Admin account deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    async fn test_pool() -> sqlx::PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = treadstock_shared::db::create_pool(&url, 2).await.unwrap();
        treadstock_shared::db::run_migrations(&pool).await.unwrap();
        pool
    }

    async fn seed_account(pool: &sqlx::PgPool) -> Uuid {
        let email = format!("account-{}@example.com", Uuid::new_v4());
        sqlx::query_scalar(
            r#"
            INSERT INTO admin_accounts (email, password_hash, name)
            VALUES ($1, $2, 'Account Test')
            RETURNING id
            "#,
        )
        .bind(&email)
        .bind(hash_password("Original1pw").unwrap())
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn stored_hash(pool: &sqlx::PgPool, id: Uuid) -> String {
        sqlx::query_scalar("SELECT password_hash FROM admin_accounts WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_non_credential_update_keeps_hash() {
        let pool = test_pool().await;
        let account_id = seed_account(&pool).await;
        let hash_before = stored_hash(&pool, account_id).await;

        let updated = apply_account_changes(
            &pool,
            account_id,
            AccountChanges {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(stored_hash(&pool, account_id).await, hash_before);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_credential_update_replaces_hash() {
        let pool = test_pool().await;
        let account_id = seed_account(&pool).await;
        let hash_before = stored_hash(&pool, account_id).await;

        apply_account_changes(
            &pool,
            account_id,
            AccountChanges {
                password_hash: Some(hash_password("Replaced1pw").unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        let hash_after = stored_hash(&pool, account_id).await;
        assert_ne!(hash_after, hash_before);
        assert!(crate::auth::verify_password("Replaced1pw", &hash_after).unwrap());
    }
}
