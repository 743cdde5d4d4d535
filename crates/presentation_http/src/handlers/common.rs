//! Shared helpers for the tracking handlers

use application::{ApplicationError, RequestHead};
use axum::http::{HeaderName, request::Parts};
use tracing::{debug, warn};

use crate::routes::RouteKind;

/// Build the normalizer's view of a request
///
/// `path` must already be normalized. Headers listed in `skip` are left out
/// of the message.
pub fn request_head(parts: &Parts, path: String, skip: &[HeaderName]) -> RequestHead {
    let headers = parts
        .headers
        .iter()
        .filter(|(name, _)| !skip.contains(name))
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    RequestHead::new(parts.method.as_str(), path, parts.uri.query(), headers)
}

/// Log a failed decode
///
/// Truncated bodies are nearly always dropped connections and only show up
/// at debug level.
pub fn log_decode_error(kind: RouteKind, head: &RequestHead, err: &ApplicationError) {
    if err.is_truncated() {
        debug!(?kind, method = %head.method, path = %head.path, "Request body ended early");
    } else {
        warn!(?kind, method = %head.method, path = %head.path, error = %err, "Failed to read request");
    }
}
