//! Application state for the web layer.

use std::sync::Arc;

use crate::tracker::LineTracker;

/// Shared application state.
///
/// Generic over the upstream sources so handlers can be exercised with
/// in-memory fakes.
pub struct AppState<S, G> {
    /// Builds stop lists and bus snapshots per line
    pub tracker: Arc<LineTracker<S, G>>,
}

impl<S, G> AppState<S, G> {
    /// Create a new app state.
    pub fn new(tracker: LineTracker<S, G>) -> Self {
        Self {
            tracker: Arc::new(tracker),
        }
    }
}

// Derived Clone would require S: Clone and G: Clone.
impl<S, G> Clone for AppState<S, G> {
    fn clone(&self) -> Self {
        Self {
            tracker: Arc::clone(&self.tracker),
        }
    }
}
