//! Feedback route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use quickcar_core::ServiceRecordId;
use serde::Deserialize;
use serde_json::json;

use crate::db::FeedbackRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Feedback request body.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub rating: u8,
    pub comment: Option<String>,
}

/// POST /api/services/{id}/feedback
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Json(body): Json<FeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::BadRequest("rating must be between 1 and 5".to_owned()));
    }

    let feedback_id = FeedbackRepository::new(state.pool())
        .submit(
            user.id,
            ServiceRecordId::new(id),
            body.rating,
            body.comment.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "feedback_id": feedback_id }))))
}
