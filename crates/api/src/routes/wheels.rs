//! Wheel listing routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

use treadstock_shared::{Wheel, WheelMaterial};

#[derive(Debug, Deserialize)]
pub struct CreateWheelRequest {
    pub brand: String,
    pub rim_diameter_in: i32,
    pub bolt_pattern: String,
    pub material: WheelMaterial,
    pub price_cents: i64,
    pub stock_count: Option<i32>,
    pub published: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWheelRequest {
    pub brand: Option<String>,
    pub rim_diameter_in: Option<i32>,
    pub bolt_pattern: Option<String>,
    pub material: Option<WheelMaterial>,
    pub price_cents: Option<i64>,
    pub stock_count: Option<i32>,
    pub published: Option<bool>,
}

/// Storefront: list published wheels
pub async fn list_wheels(State(state): State<AppState>) -> ApiResult<Json<Vec<Wheel>>> {
    let wheels: Vec<Wheel> =
        sqlx::query_as("SELECT * FROM wheels WHERE published = TRUE ORDER BY created_at DESC")
            .fetch_all(&state.pool)
            .await?;

    Ok(Json(wheels))
}

/// Storefront: fetch one published wheel
pub async fn get_wheel(
    State(state): State<AppState>,
    Path(wheel_id): Path<Uuid>,
) -> ApiResult<Json<Wheel>> {
    let wheel: Wheel = sqlx::query_as("SELECT * FROM wheels WHERE id = $1 AND published = TRUE")
        .bind(wheel_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(wheel))
}

/// Back office: list all wheels, drafts included
pub async fn admin_list_wheels(State(state): State<AppState>) -> ApiResult<Json<Vec<Wheel>>> {
    let wheels: Vec<Wheel> = sqlx::query_as("SELECT * FROM wheels ORDER BY created_at DESC")
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(wheels))
}

/// Back office: create a wheel listing
pub async fn create_wheel(
    State(state): State<AppState>,
    Json(req): Json<CreateWheelRequest>,
) -> ApiResult<(StatusCode, Json<Wheel>)> {
    if req.brand.trim().is_empty() || req.bolt_pattern.trim().is_empty() {
        return Err(ApiError::Validation(
            "Brand and bolt pattern must not be empty".to_string(),
        ));
    }
    if !(10..=24).contains(&req.rim_diameter_in) {
        return Err(ApiError::Validation(
            "Rim diameter must be between 10 and 24 inches".to_string(),
        ));
    }
    if req.price_cents < 0 {
        return Err(ApiError::Validation(
            "Price must not be negative".to_string(),
        ));
    }

    let wheel: Wheel = sqlx::query_as(
        r#"
        INSERT INTO wheels (brand, rim_diameter_in, bolt_pattern, material, price_cents, stock_count, published)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(req.brand.trim())
    .bind(req.rim_diameter_in)
    .bind(req.bolt_pattern.trim())
    .bind(req.material)
    .bind(req.price_cents)
    .bind(req.stock_count.unwrap_or(0))
    .bind(req.published.unwrap_or(false))
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(wheel_id = %wheel.id, "Wheel created");

    Ok((StatusCode::CREATED, Json(wheel)))
}

/// Back office: update a wheel listing
pub async fn update_wheel(
    State(state): State<AppState>,
    Path(wheel_id): Path<Uuid>,
    Json(req): Json<UpdateWheelRequest>,
) -> ApiResult<Json<Wheel>> {
    if let Some(price_cents) = req.price_cents {
        if price_cents < 0 {
            return Err(ApiError::Validation(
                "Price must not be negative".to_string(),
            ));
        }
    }

    let wheel: Wheel = sqlx::query_as(
        r#"
        UPDATE wheels
        SET brand = COALESCE($1, brand),
            rim_diameter_in = COALESCE($2, rim_diameter_in),
            bolt_pattern = COALESCE($3, bolt_pattern),
            material = COALESCE($4, material),
            price_cents = COALESCE($5, price_cents),
            stock_count = COALESCE($6, stock_count),
            published = COALESCE($7, published),
            updated_at = NOW()
        WHERE id = $8
        RETURNING *
        "#,
    )
    .bind(&req.brand)
    .bind(req.rim_diameter_in)
    .bind(&req.bolt_pattern)
    .bind(req.material)
    .bind(req.price_cents)
    .bind(req.stock_count)
    .bind(req.published)
    .bind(wheel_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(wheel))
}

/// Back office: delete a wheel listing
pub async fn delete_wheel(
    State(state): State<AppState>,
    Path(wheel_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let result = sqlx::query("DELETE FROM wheels WHERE id = $1")
        .bind(wheel_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }

    tracing::info!(wheel_id = %wheel_id, "Wheel deleted");

    Ok(StatusCode::NO_CONTENT)
}
