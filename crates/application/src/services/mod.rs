//! Application services - Use case implementations

mod tracker_service;

pub use tracker_service::TrackerService;
