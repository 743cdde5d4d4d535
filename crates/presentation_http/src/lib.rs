//! tracking-chaos HTTP presentation layer
//!
//! Tracking endpoints, the static endpoints and the fault injection
//! middleware wrapped around all of them.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::{ChaosLayer, ChaosService};
pub use routes::{
    Route, RouteKind, cors_layer, create_app, create_router, lookup_route, normalize_path,
};
pub use state::AppState;
