//! Tire listing routes

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

use treadstock_shared::{Tire, TireSeason};

#[derive(Debug, Deserialize)]
pub struct CreateTireRequest {
    pub brand: String,
    pub model: String,
    pub width_mm: i32,
    pub aspect_ratio: i32,
    pub rim_diameter_in: i32,
    pub season: TireSeason,
    pub price_cents: i64,
    pub stock_count: Option<i32>,
    pub published: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTireRequest {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub width_mm: Option<i32>,
    pub aspect_ratio: Option<i32>,
    pub rim_diameter_in: Option<i32>,
    pub season: Option<TireSeason>,
    pub price_cents: Option<i64>,
    pub stock_count: Option<i32>,
    pub published: Option<bool>,
}

/// Tire sizes as sold: 135-355 mm widths, 25-85 aspect, 10-24 inch rims
fn validate_tire_size(width_mm: i32, aspect_ratio: i32, rim_diameter_in: i32) -> ApiResult<()> {
    if !(135..=355).contains(&width_mm) {
        return Err(ApiError::Validation(
            "Tire width must be between 135 and 355 mm".to_string(),
        ));
    }
    if !(25..=85).contains(&aspect_ratio) {
        return Err(ApiError::Validation(
            "Aspect ratio must be between 25 and 85".to_string(),
        ));
    }
    if !(10..=24).contains(&rim_diameter_in) {
        return Err(ApiError::Validation(
            "Rim diameter must be between 10 and 24 inches".to_string(),
        ));
    }
    Ok(())
}

/// Storefront: list published tires
pub async fn list_tires(State(state): State<AppState>) -> ApiResult<Json<Vec<Tire>>> {
    let tires: Vec<Tire> =
        sqlx::query_as("SELECT * FROM tires WHERE published = TRUE ORDER BY created_at DESC")
            .fetch_all(&state.pool)
            .await?;

    Ok(Json(tires))
}

/// Storefront: fetch one published tire
pub async fn get_tire(
    State(state): State<AppState>,
    Path(tire_id): Path<Uuid>,
) -> ApiResult<Json<Tire>> {
    let tire: Tire = sqlx::query_as("SELECT * FROM tires WHERE id = $1 AND published = TRUE")
        .bind(tire_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(tire))
}

/// Back office: list all tires, drafts included
pub async fn admin_list_tires(State(state): State<AppState>) -> ApiResult<Json<Vec<Tire>>> {
    let tires: Vec<Tire> = sqlx::query_as("SELECT * FROM tires ORDER BY created_at DESC")
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(tires))
}

/// Back office: create a tire listing
pub async fn create_tire(
    State(state): State<AppState>,
    Json(req): Json<CreateTireRequest>,
) -> ApiResult<(StatusCode, Json<Tire>)> {
    if req.brand.trim().is_empty() || req.model.trim().is_empty() {
        return Err(ApiError::Validation(
            "Brand and model must not be empty".to_string(),
        ));
    }
    validate_tire_size(req.width_mm, req.aspect_ratio, req.rim_diameter_in)?;
    if req.price_cents < 0 {
        return Err(ApiError::Validation(
            "Price must not be negative".to_string(),
        ));
    }

    let tire: Tire = sqlx::query_as(
        r#"
        INSERT INTO tires (brand, model, width_mm, aspect_ratio, rim_diameter_in, season, price_cents, stock_count, published)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(req.brand.trim())
    .bind(req.model.trim())
    .bind(req.width_mm)
    .bind(req.aspect_ratio)
    .bind(req.rim_diameter_in)
    .bind(req.season)
    .bind(req.price_cents)
    .bind(req.stock_count.unwrap_or(0))
    .bind(req.published.unwrap_or(false))
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(tire_id = %tire.id, "Tire created");

    Ok((StatusCode::CREATED, Json(tire)))
}

/// Back office: update a tire listing
pub async fn update_tire(
    State(state): State<AppState>,
    Path(tire_id): Path<Uuid>,
    Json(req): Json<UpdateTireRequest>,
) -> ApiResult<Json<Tire>> {
    if let Some(price_cents) = req.price_cents {
        if price_cents < 0 {
            return Err(ApiError::Validation(
                "Price must not be negative".to_string(),
            ));
        }
    }

    let tire: Tire = sqlx::query_as(
        r#"
        UPDATE tires
        SET brand = COALESCE($1, brand),
            model = COALESCE($2, model),
            width_mm = COALESCE($3, width_mm),
            aspect_ratio = COALESCE($4, aspect_ratio),
            rim_diameter_in = COALESCE($5, rim_diameter_in),
            season = COALESCE($6, season),
            price_cents = COALESCE($7, price_cents),
            stock_count = COALESCE($8, stock_count),
            published = COALESCE($9, published),
            updated_at = NOW()
        WHERE id = $10
        RETURNING *
        "#,
    )
    .bind(&req.brand)
    .bind(&req.model)
    .bind(req.width_mm)
    .bind(req.aspect_ratio)
    .bind(req.rim_diameter_in)
    .bind(req.season)
    .bind(req.price_cents)
    .bind(req.stock_count)
    .bind(req.published)
    .bind(tire_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(tire))
}

/// Back office: delete a tire listing
pub async fn delete_tire(
    State(state): State<AppState>,
    Path(tire_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let result = sqlx::query("DELETE FROM tires WHERE id = $1")
        .bind(tire_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }

    tracing::info!(tire_id = %tire_id, "Tire deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tire_size() {
        // Common size 205/55 R16
        assert!(validate_tire_size(205, 55, 16).is_ok());

        assert!(validate_tire_size(100, 55, 16).is_err());
        assert!(validate_tire_size(205, 90, 16).is_err());
        assert!(validate_tire_size(205, 55, 30).is_err());
    }
}
