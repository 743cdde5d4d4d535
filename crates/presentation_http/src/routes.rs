//! Route definitions
//!
//! Tracking paths are matched case-insensitively and with an optional
//! trailing slash, so they are resolved by a fallback handler against
//! static tables rather than registered on the router one by one.

use std::time::Duration;

use axum::{
    Router,
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
    routing::get,
};
use domain::EventType;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    decompression::RequestDecompressionLayer,
};

use crate::{error::ApiError, handlers, middleware::ChaosLayer, state::AppState};

/// How long browsers may cache a preflight answer
const CORS_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Path of the liveness endpoint
pub const HEALTH_PATH: &str = "/internal/health";

/// Path of the Flash cross-domain policy
pub const CROSSDOMAIN_PATH: &str = "/crossdomain.xml";

/// Which handler serves a tracking path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Server-side libraries: JSON bodies, errors reported
    Server,
    /// Browser libraries: JSON or base64 `data`, always successful, JSONP
    Client,
    /// Tracking pixels: base64 `data` or flat query, always a GIF
    Pixel,
}

impl RouteKind {
    /// Whether the handler serves `method`
    pub fn accepts(self, method: &Method) -> bool {
        let (get, post, put) = (
            *method == Method::GET,
            *method == Method::POST,
            *method == Method::PUT,
        );
        match self {
            Self::Server => post || put,
            Self::Client => get || post || put,
            Self::Pixel => get,
        }
    }
}

/// A resolved tracking route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub kind: RouteKind,
    pub event_type: EventType,
}

const SERVER_ROUTES: [(&str, EventType); 8] = [
    ("/v1/identify", EventType::Identify),
    ("/v1/group", EventType::Group),
    ("/v1/alias", EventType::Alias),
    ("/v1/page", EventType::Page),
    ("/v1/screen", EventType::Screen),
    ("/v1/track", EventType::Track),
    ("/v1/batch", EventType::Batch),
    ("/v1/import", EventType::Batch),
];

const CLIENT_ROUTES: [(&str, EventType); 7] = [
    ("/v1/i", EventType::Identify),
    ("/v1/g", EventType::Group),
    ("/v1/a", EventType::Alias),
    ("/v1/p", EventType::Page),
    ("/v1/s", EventType::Screen),
    ("/v1/t", EventType::Track),
    ("/v1/b", EventType::Batch),
];

const PIXEL_ROUTES: [(&str, EventType); 6] = [
    ("/v1/pixel/identify", EventType::Identify),
    ("/v1/pixel/group", EventType::Group),
    ("/v1/pixel/alias", EventType::Alias),
    ("/v1/pixel/page", EventType::Page),
    ("/v1/pixel/screen", EventType::Screen),
    ("/v1/pixel/track", EventType::Track),
];

/// Lower-case a request path and strip one trailing slash
pub fn normalize_path(path: &str) -> String {
    let lower = path.to_lowercase();
    match lower.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => lower,
    }
}

/// Find the tracking route for an already normalized path
pub fn lookup_route(path: &str) -> Option<Route> {
    let tables: [(RouteKind, &[(&str, EventType)]); 3] = [
        (RouteKind::Pixel, &PIXEL_ROUTES),
        (RouteKind::Server, &SERVER_ROUTES),
        (RouteKind::Client, &CLIENT_ROUTES),
    ];

    tables.into_iter().find_map(|(kind, table)| {
        table
            .iter()
            .find(|(route, _)| *route == path)
            .map(|&(_, event_type)| Route { kind, event_type })
    })
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(handlers::health::health_check))
        .route(CROSSDOMAIN_PATH, get(handlers::crossdomain::crossdomain))
        .fallback(dispatch)
        .with_state(state)
}

/// The router wrapped in everything the tracking endpoints need
///
/// Faults are injected outermost, so preflight requests and gzip failures
/// are subject to them as well.
pub fn create_app(state: AppState, chaos: ChaosLayer) -> Router {
    create_router(state)
        .layer(RequestDecompressionLayer::new())
        .layer(cors_layer())
        .layer(chaos)
}

/// Permissive CORS for browser and server libraries alike
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}

/// Resolve a request that did not match a static route
async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    let path = normalize_path(req.uri().path());

    let Some(route) = lookup_route(&path) else {
        let is_get = req.method() == Method::GET;
        return match path.as_str() {
            HEALTH_PATH if is_get => handlers::health::health_check().await.into_response(),
            CROSSDOMAIN_PATH if is_get => handlers::crossdomain::crossdomain().await.into_response(),
            _ => ApiError::NotFound(path).into_response(),
        };
    };

    if !route.kind.accepts(req.method()) {
        return ApiError::MethodNotAllowed(req.method().to_string()).into_response();
    }

    match route.kind {
        RouteKind::Server => handlers::server::handle(&state, route.event_type, path, req)
            .await
            .into_response(),
        RouteKind::Client => handlers::client::handle(&state, route.event_type, path, req)
            .await
            .into_response(),
        RouteKind::Pixel => handlers::pixel::handle(&state, route.event_type, path, req)
            .await
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_lowered_and_trimmed() {
        assert_eq!(normalize_path("/V1/Track/"), "/v1/track");
        assert_eq!(normalize_path("/v1/pixel/PAGE"), "/v1/pixel/page");
        assert_eq!(normalize_path("/v1/t"), "/v1/t");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn only_one_trailing_slash_is_stripped() {
        assert_eq!(normalize_path("/v1/track//"), "/v1/track/");
        assert!(lookup_route(&normalize_path("/v1/track//")).is_none());
    }

    #[test]
    fn import_is_a_batch_server_route() {
        assert_eq!(
            lookup_route("/v1/import"),
            Some(Route {
                kind: RouteKind::Server,
                event_type: EventType::Batch,
            })
        );
    }

    #[test]
    fn every_table_resolves() {
        assert_eq!(lookup_route("/v1/b").map(|r| r.kind), Some(RouteKind::Client));
        assert_eq!(
            lookup_route("/v1/pixel/screen"),
            Some(Route {
                kind: RouteKind::Pixel,
                event_type: EventType::Screen,
            })
        );
        assert_eq!(
            lookup_route("/v1/identify").map(|r| r.event_type),
            Some(EventType::Identify)
        );
        assert!(lookup_route("/v1/pixel/batch").is_none());
        assert!(lookup_route("/internal/health").is_none());
    }

    #[test]
    fn methods_per_kind() {
        assert!(RouteKind::Server.accepts(&Method::PUT));
        assert!(!RouteKind::Server.accepts(&Method::GET));
        assert!(RouteKind::Client.accepts(&Method::GET));
        assert!(!RouteKind::Pixel.accepts(&Method::POST));
    }
}
