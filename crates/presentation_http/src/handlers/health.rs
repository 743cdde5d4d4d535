//! Health check handler

use axum::{
    http::{StatusCode, header},
    response::IntoResponse,
};

/// Liveness check: `200` with an empty body
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::CONTENT_LENGTH, "0"),
        ],
    )
}
