//! Fault injection
//!
//! [`config`] validates chaos documents into a [`domain::WeightedChaos`];
//! [`dispatcher`] draws from it per request.

pub mod config;
pub mod dispatcher;

pub use config::{
    ChaosConfigError, ChaosEntryError, DOCUMENT_KEY, FaultKind, WEIGHT_KEY, parse_chaos_document,
    parse_chaos_entries,
};
pub use dispatcher::{ChaosDispatcher, FaultPlan, RngSource, sample_delay};
