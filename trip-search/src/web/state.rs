//! Application state for the web layer.

use std::sync::Arc;

use crate::analytics::{AnalyticsEmitter, TracingEmitter};
use crate::config::SearchConfig;
use crate::geocoding::{CachedGeocoder, Geocoder, PeliasClient};
use crate::search::DefaultRanker;
use crate::store::MemoryContext;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
pub struct AppState<G = CachedGeocoder<PeliasClient>> {
    /// User data and transit catalogue
    pub context: Arc<MemoryContext>,

    /// Geocoding backend
    pub geocoder: Arc<G>,

    /// Search configuration
    pub config: Arc<SearchConfig>,

    /// Result ranking
    pub ranker: DefaultRanker,

    /// Sink for settings analytics
    pub analytics: Arc<dyn AnalyticsEmitter>,
}

impl<G: Geocoder> AppState<G> {
    /// Create a new app state.
    pub fn new(context: MemoryContext, geocoder: G, config: SearchConfig) -> Self {
        Self {
            context: Arc::new(context),
            geocoder: Arc::new(geocoder),
            config: Arc::new(config),
            ranker: DefaultRanker,
            analytics: Arc::new(TracingEmitter),
        }
    }

    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsEmitter>) -> Self {
        self.analytics = analytics;
        self
    }
}

// Manual impl: `G` itself need not be `Clone`.
impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
            geocoder: Arc::clone(&self.geocoder),
            config: Arc::clone(&self.config),
            ranker: self.ranker,
            analytics: Arc::clone(&self.analytics),
        }
    }
}
