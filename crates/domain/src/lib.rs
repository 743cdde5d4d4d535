//! Domain layer for tracking-chaos
//!
//! Canonical message record, payload variants, event types and the
//! weighted fault model. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
