//! HTTP middleware components

pub mod chaos;

pub use chaos::{ChaosLayer, ChaosService, override_status};
