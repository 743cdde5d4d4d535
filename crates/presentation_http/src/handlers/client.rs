//! Browser library endpoints
//!
//! Browsers cannot do anything useful with an error, so these endpoints
//! always answer success and only log what went wrong.

use application::normalizer::normalize;
use axum::{
    Json,
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use domain::EventType;
use tracing::debug;

use super::common::{log_decode_error, request_head};
use crate::{error::TrackResponse, routes::RouteKind, state::AppState};

/// Query parameter naming a JSONP callback
pub const CALLBACK_PARAM: &str = "callback";

/// `Cache-Control` for responses browsers must not reuse
pub(crate) const NO_CACHE: &str = "no-cache, max-age=0";

/// Normalize and publish one browser submission
pub async fn handle(state: &AppState, event_type: EventType, path: String, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let head = request_head(&parts, path, &[]);

    match normalize(event_type, &head, body.into_data_stream()).await {
        Ok(message) => {
            if let Err(e) = state.tracker.track(message).await {
                debug!(error = %e, "Browser message dropped");
            }
        },
        Err(e) => log_decode_error(RouteKind::Client, &head, &e),
    }

    if let Some(callback) = head.query.get(CALLBACK_PARAM).filter(|name| is_callback_name(name)) {
        return jsonp(callback);
    }

    let mut response = Json(TrackResponse::ok()).into_response();
    if head.is_get() {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    }
    response
}

/// A JSONP success answer invoking `callback`
pub fn jsonp(callback: &str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/javascript")],
        format!(r#"typeof {callback} == "function" && {callback}({{ success: true }});"#),
    )
        .into_response()
}

/// Callback names are spliced into script, so only identifier paths pass
fn is_callback_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
}
