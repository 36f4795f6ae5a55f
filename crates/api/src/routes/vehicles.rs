//! Vehicle listing routes

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

use treadstock_shared::Vehicle;

#[derive(Debug, Deserialize)]
pub struct CreateVehicleRequest {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price_cents: i64,
    pub mileage_km: Option<i32>,
    pub fuel_type: String,
    pub transmission: String,
    pub description: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVehicleRequest {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price_cents: Option<i64>,
    pub mileage_km: Option<i32>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub description: Option<String>,
    pub published: Option<bool>,
}

fn validate_vehicle_fields(make: &str, model: &str, price_cents: i64) -> ApiResult<()> {
    if make.trim().is_empty() || model.trim().is_empty() {
        return Err(ApiError::Validation(
            "Make and model must not be empty".to_string(),
        ));
    }
    if price_cents < 0 {
        return Err(ApiError::Validation(
            "Price must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Storefront: list published vehicles
pub async fn list_vehicles(State(state): State<AppState>) -> ApiResult<Json<Vec<Vehicle>>> {
    let vehicles: Vec<Vehicle> =
        sqlx::query_as("SELECT * FROM vehicles WHERE published = TRUE ORDER BY created_at DESC")
            .fetch_all(&state.pool)
            .await?;

    Ok(Json(vehicles))
}

/// Storefront: fetch one published vehicle
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> ApiResult<Json<Vehicle>> {
    let vehicle: Vehicle =
        sqlx::query_as("SELECT * FROM vehicles WHERE id = $1 AND published = TRUE")
            .bind(vehicle_id)
            .fetch_optional(&state.pool)
            .await?
            .ok_or(ApiError::NotFound)?;

    Ok(Json(vehicle))
}

/// Back office: list all vehicles, drafts included
pub async fn admin_list_vehicles(State(state): State<AppState>) -> ApiResult<Json<Vec<Vehicle>>> {
    let vehicles: Vec<Vehicle> = sqlx::query_as("SELECT * FROM vehicles ORDER BY created_at DESC")
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(vehicles))
}

/// Back office: create a vehicle listing
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(req): Json<CreateVehicleRequest>,
) -> ApiResult<(StatusCode, Json<Vehicle>)> {
    validate_vehicle_fields(&req.make, &req.model, req.price_cents)?;

    let vehicle: Vehicle = sqlx::query_as(
        r#"
        INSERT INTO vehicles (make, model, year, price_cents, mileage_km, fuel_type, transmission, description, published)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(req.make.trim())
    .bind(req.model.trim())
    .bind(req.year)
    .bind(req.price_cents)
    .bind(req.mileage_km.unwrap_or(0))
    .bind(&req.fuel_type)
    .bind(&req.transmission)
    .bind(&req.description)
    .bind(req.published.unwrap_or(false))
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(vehicle_id = %vehicle.id, "Vehicle created");

    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// Back office: update a vehicle listing
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    Json(req): Json<UpdateVehicleRequest>,
) -> ApiResult<Json<Vehicle>> {
    if let Some(price_cents) = req.price_cents {
        if price_cents < 0 {
            return Err(ApiError::Validation(
                "Price must not be negative".to_string(),
            ));
        }
    }

    let vehicle: Vehicle = sqlx::query_as(
        r#"
        UPDATE vehicles
        SET make = COALESCE($1, make),
            model = COALESCE($2, model),
            year = COALESCE($3, year),
            price_cents = COALESCE($4, price_cents),
            mileage_km = COALESCE($5, mileage_km),
            fuel_type = COALESCE($6, fuel_type),
            transmission = COALESCE($7, transmission),
            description = COALESCE($8, description),
            published = COALESCE($9, published),
            updated_at = NOW()
        WHERE id = $10
        RETURNING *
        "#,
    )
    .bind(&req.make)
    .bind(&req.model)
    .bind(req.year)
    .bind(req.price_cents)
    .bind(req.mileage_km)
    .bind(&req.fuel_type)
    .bind(&req.transmission)
    .bind(&req.description)
    .bind(req.published)
    .bind(vehicle_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(vehicle))
}

/// Back office: delete a vehicle listing
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
        .bind(vehicle_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }

    tracing::info!(vehicle_id = %vehicle_id, "Vehicle deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_vehicle_fields() {
        assert!(validate_vehicle_fields("Volvo", "V60", 1_250_000).is_ok());
        assert!(validate_vehicle_fields("", "V60", 1_250_000).is_err());
        assert!(validate_vehicle_fields("Volvo", "  ", 1_250_000).is_err());
        assert!(validate_vehicle_fields("Volvo", "V60", -1).is_err());
    }
}
