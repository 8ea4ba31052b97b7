//! Support chat route handler.

use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::services::support;

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// POST /api/chat
pub async fn respond(Json(body): Json<ChatRequest>) -> Json<serde_json::Value> {
    Json(json!({ "reply": support::respond(&body.message) }))
}
