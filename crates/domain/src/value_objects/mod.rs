//! Value objects

mod event_type;

pub use event_type::{BATCH_LIMIT, EventType, SINGLE_LIMIT};
