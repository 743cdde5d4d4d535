//! Application state shared across handlers

use std::sync::Arc;

use application::TrackerService;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Stamps and publishes accepted messages
    pub tracker: Arc<TrackerService>,
}

impl AppState {
    pub fn new(tracker: TrackerService) -> Self {
        Self {
            tracker: Arc::new(tracker),
        }
    }
}
