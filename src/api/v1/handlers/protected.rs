/*
 * Responsibility
 * - GET /protected (access 検証を通過した request だけが到達する)
 * - claims は見ない。到達したこと自体が認可済みの印
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub status: &'static str,
}

pub async fn protected() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ProtectedResponse {
            status: "authorized",
        }),
    )
}
