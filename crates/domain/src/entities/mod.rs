//! Domain entities

pub mod chaos;
pub mod message;
pub mod payload;

pub use chaos::{
    DEFAULT_WEIGHT, FaultAction, LatencyFault, MAX_TOTAL_WEIGHT, NO_FAULT, StatusCodeFault,
    WeightedChaos, WeightedFault,
};
pub use message::{HOP_BY_HOP_HEADERS, HeaderValues, Message, canonical_header_key, is_hop_by_hop_header};
pub use payload::{Body, BodyValue, PROPERTY_RECEIVED_AT, Payload, RawBody, format_timestamp};
