/*
 * Responsibility
 * - GET /health (疎通用)
 * - トークンの有無に関係なく到達できる
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
