//! Tracking pixel endpoints

use application::normalizer::from_pixel;
use axum::{
    extract::Request,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use domain::EventType;
use tracing::debug;

use super::{
    client::NO_CACHE,
    common::{log_decode_error, request_head},
};
use crate::{routes::RouteKind, state::AppState};

/// A 1x1 transparent GIF
pub const GIF: [u8; 42] = [
    71, 73, 70, 56, 57, 97, 1, 0, 1, 0, 128, 0, 0, 0, 0, 0, 255, 255, 255, 33, 249, 4, 1, 0, 0, 0,
    0, 44, 0, 0, 0, 0, 1, 0, 1, 0, 0, 2, 1, 68, 0, 59,
];

/// Record a pixel hit and answer with [`GIF`] whatever happened
pub async fn handle(state: &AppState, event_type: EventType, path: String, req: Request) -> Response {
    let (parts, _) = req.into_parts();
    let head = request_head(&parts, path, &[]);

    match from_pixel(event_type, &head) {
        Ok(message) => {
            if let Err(e) = state.tracker.track(message).await {
                debug!(error = %e, "Pixel message dropped");
            }
        },
        Err(e) => log_decode_error(RouteKind::Pixel, &head, &e),
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/gif"),
            (header::CACHE_CONTROL, NO_CACHE),
        ],
        GIF.as_slice(),
    )
        .into_response()
}
