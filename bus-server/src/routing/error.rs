//! Route geometry error types.

/// Errors that can occur when fetching a road geometry.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Routing service returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The router answered but found no route
    #[error("no route found: {code}")]
    NoRoute { code: String },

    /// A route needs at least two stops
    #[error("need at least two stops, got {0}")]
    TooFewStops(usize),
}
