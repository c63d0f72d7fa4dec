//! Arrival/stop source error types.

/// Errors from talking to the operator's website.
#[derive(Debug, thiserror::Error)]
pub enum DbusError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The stop list could not be parsed
    #[error("XML parse error: {message}")]
    Xml { message: String },

    /// The line page did not reference a markers file
    #[error("could not find map id in line page")]
    MissingMapId,

    /// The line page did not contain a security nonce
    #[error("could not find security nonce in line page")]
    MissingNonce,

    /// Every per-stop arrival request failed
    #[error("no arrivals could be fetched ({failed} stops failed)")]
    NoArrivals { failed: usize },
}
