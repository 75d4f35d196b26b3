//! Geocoding client error types.

/// Errors from the geocoding backend.
#[derive(Debug, thiserror::Error)]
pub enum GeocodingError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limited by the backend
    #[error("rate limited by geocoding API")]
    RateLimited,

    /// Backend returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
