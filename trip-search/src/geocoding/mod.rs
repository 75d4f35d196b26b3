//! Geocoding backend access.
//!
//! Free-text place search is delegated to a Pelias-compatible API. The
//! `Geocoder` trait is the seam the search pipeline depends on; the HTTP
//! client and the caching wrapper both implement it.

mod cache;
mod client;
mod error;
mod query;

use std::future::Future;

use crate::domain::ResultItem;

pub use cache::{CacheConfig, CachedGeocoder};
pub use client::{FeatureCollection, PeliasClient, PeliasConfig};
pub use error::GeocodingError;
pub use query::{FocusPoint, GeocodingQuery, LOCATION_LAYERS, STOP_LAYERS};

/// Resolves free text to geocoded features.
pub trait Geocoder: Send + Sync {
    fn resolve(
        &self,
        query: &GeocodingQuery,
    ) -> impl Future<Output = Result<Vec<ResultItem>, GeocodingError>> + Send;
}
