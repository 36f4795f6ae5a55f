//! Contact inquiry routes
//!
//! The public storefront submits inquiries through the contact form; admins
//! triage them and reply by email from the back office.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::middleware::AuthAdmin,
    error::{ApiError, ApiResult},
    state::AppState,
};

use treadstock_shared::{Inquiry, InquiryStatus, ListingKind};

use super::auth::is_valid_email;

const MAX_MESSAGE_LENGTH: usize = 5000;

#[derive(Debug, Deserialize)]
pub struct SubmitInquiryRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub listing_kind: Option<ListingKind>,
    pub listing_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInquiryRequest {
    pub status: InquiryStatus,
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitInquiryResponse {
    pub message: String,
}

/// Storefront: submit a contact inquiry
pub async fn submit_inquiry(
    State(state): State<AppState>,
    Json(req): Json<SubmitInquiryRequest>,
) -> ApiResult<(StatusCode, Json<SubmitInquiryResponse>)> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Name must not be empty".to_string()));
    }
    if !is_valid_email(&req.email) {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }
    if req.message.trim().is_empty() {
        return Err(ApiError::Validation(
            "Message must not be empty".to_string(),
        ));
    }
    if req.message.len() > MAX_MESSAGE_LENGTH {
        return Err(ApiError::Validation(format!(
            "Message must be at most {} characters",
            MAX_MESSAGE_LENGTH
        )));
    }
    // A referenced listing needs both halves of the reference
    if req.listing_kind.is_some() != req.listing_id.is_some() {
        return Err(ApiError::Validation(
            "Listing reference requires both kind and id".to_string(),
        ));
    }

    let inquiry_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO inquiries (name, email, phone, message, listing_kind, listing_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(req.name.trim())
    .bind(req.email.trim().to_lowercase())
    .bind(&req.phone)
    .bind(req.message.trim())
    .bind(req.listing_kind)
    .bind(req.listing_id)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(inquiry_id = %inquiry_id, "Inquiry submitted");

    Ok((
        StatusCode::CREATED,
        Json(SubmitInquiryResponse {
            message: "Thank you for your inquiry. We will get back to you shortly.".to_string(),
        }),
    ))
}

/// Back office: list inquiries, newest first
pub async fn list_inquiries(State(state): State<AppState>) -> ApiResult<Json<Vec<Inquiry>>> {
    let inquiries: Vec<Inquiry> =
        sqlx::query_as("SELECT * FROM inquiries ORDER BY created_at DESC")
            .fetch_all(&state.pool)
            .await?;

    Ok(Json(inquiries))
}

/// Back office: fetch one inquiry
pub async fn get_inquiry(
    State(state): State<AppState>,
    Path(inquiry_id): Path<Uuid>,
) -> ApiResult<Json<Inquiry>> {
    let inquiry: Inquiry = sqlx::query_as("SELECT * FROM inquiries WHERE id = $1")
        .bind(inquiry_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(inquiry))
}

/// Back office: update triage status
pub async fn update_inquiry(
    State(state): State<AppState>,
    Path(inquiry_id): Path<Uuid>,
    Json(req): Json<UpdateInquiryRequest>,
) -> ApiResult<Json<Inquiry>> {
    let inquiry: Inquiry = sqlx::query_as(
        r#"
        UPDATE inquiries
        SET status = $1
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(req.status)
    .bind(inquiry_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(ApiError::NotFound)?;

    tracing::info!(inquiry_id = %inquiry_id, status = %inquiry.status, "Inquiry status updated");

    Ok(Json(inquiry))
}

/// Back office: reply to an inquiry by email
///
/// The reply is recorded first; delivery is best-effort and never undoes the
/// bookkeeping. A new inquiry moves to in-progress on first reply.
pub async fn reply_to_inquiry(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthAdmin>,
    Path(inquiry_id): Path<Uuid>,
    Json(req): Json<ReplyRequest>,
) -> ApiResult<Json<Inquiry>> {
    if req.message.trim().is_empty() {
        return Err(ApiError::Validation(
            "Reply message must not be empty".to_string(),
        ));
    }

    let inquiry: Inquiry = sqlx::query_as(
        r#"
        UPDATE inquiries
        SET replied_at = NOW(),
            replied_by = $1,
            status = CASE WHEN status = 'new' THEN 'in_progress' ELSE status END
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(admin.id)
    .bind(inquiry_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(ApiError::NotFound)?;

    let email_service = state.email.clone();
    let recipient = inquiry.email.clone();
    let customer_name = inquiry.name.clone();
    let reply = req.message.trim().to_string();
    tokio::spawn(async move {
        email_service
            .send_inquiry_reply(&recipient, &customer_name, &reply)
            .await;
    });

    tracing::info!(
        inquiry_id = %inquiry_id,
        admin_id = %admin.id,
        "Inquiry reply sent"
    );

    Ok(Json(inquiry))
}
