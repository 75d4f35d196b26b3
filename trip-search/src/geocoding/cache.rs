//! Caching layer for geocoding responses.
//!
//! Autosuggest fires a query per keystroke, and users tend to retype the same
//! prefixes. Focus points are rounded before they reach the query, so the
//! full query is a good cache key.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::ResultItem;

use super::Geocoder;
use super::error::GeocodingError;
use super::query::GeocodingQuery;

/// Cached geocoding response.
type Entry = Arc<Vec<ResultItem>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 10_000,
        }
    }
}

/// Geocoder with response caching.
///
/// Wraps any `Geocoder` and caches successful responses by query. Errors are
/// never cached.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: MokaCache<GeocodingQuery, Entry>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    /// Create a new cached geocoder.
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Access the underlying geocoder for operations that bypass cache.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn resolve(&self, query: &GeocodingQuery) -> Result<Vec<ResultItem>, GeocodingError> {
        if let Some(cached) = self.cache.get(query).await {
            trace!(text = %query.text, "geocoding cache hit");
            return Ok(cached.as_ref().clone());
        }

        let features = self.inner.resolve(query).await?;
        self.cache
            .insert(query.clone(), Arc::new(features.clone()))
            .await;

        Ok(features)
    }
}
