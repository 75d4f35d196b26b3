//! Search source error types.

use serde::{Serialize, Serializer};

use crate::geocoding::GeocodingError;

/// A source failed to produce its results.
///
/// Cloneable so it can travel inside a delivered result batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The geocoding backend call failed
    #[error("geocoding failed: {0}")]
    Geocoding(String),

    /// A context lookup (stops, routes, ...) failed
    #[error("{lookup} lookup failed: {message}")]
    Lookup {
        lookup: &'static str,
        message: String,
    },
}

impl SourceError {
    pub fn lookup(lookup: &'static str, message: impl Into<String>) -> Self {
        SourceError::Lookup {
            lookup,
            message: message.into(),
        }
    }
}

impl From<GeocodingError> for SourceError {
    fn from(err: GeocodingError) -> Self {
        SourceError::Geocoding(err.to_string())
    }
}

impl Serialize for SourceError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
