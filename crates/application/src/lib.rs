//! Application layer - Use cases and orchestration
//!
//! Message normalization, chaos validation and dispatch, and the ports the
//! infrastructure layer implements.

pub mod chaos;
pub mod error;
pub mod normalizer;
pub mod ports;
pub mod services;

pub use chaos::{ChaosConfigError, ChaosDispatcher, ChaosEntryError, FaultPlan};
pub use error::ApplicationError;
pub use normalizer::{QueryValues, RequestHead};
pub use ports::*;
pub use services::*;
