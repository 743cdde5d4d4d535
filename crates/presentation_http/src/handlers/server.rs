//! Server-side library endpoints
//!
//! `POST`/`PUT` with a JSON body. Decode failures are reported to the
//! caller, unlike the browser endpoints.

use application::normalizer::normalize;
use axum::{Json, extract::Request, http::header};
use domain::EventType;

use super::common::{log_decode_error, request_head};
use crate::{
    error::{ApiError, TrackResponse},
    routes::RouteKind,
    state::AppState,
};

/// Normalize and publish one server-side submission
///
/// Gzip bodies arrive already decoded, so `Content-Encoding` is not copied
/// into the message.
pub async fn handle(
    state: &AppState,
    event_type: EventType,
    path: String,
    req: Request,
) -> Result<Json<TrackResponse>, ApiError> {
    let (parts, body) = req.into_parts();
    let head = request_head(&parts, path, &[header::CONTENT_ENCODING]);

    let message = normalize(event_type, &head, body.into_data_stream())
        .await
        .map_err(|e| {
            log_decode_error(RouteKind::Server, &head, &e);
            ApiError::from(e)
        })?;

    state.tracker.track(message).await?;

    Ok(Json(TrackResponse::ok()))
}
