//! Geocoding query parameters.

use std::collections::BTreeMap;

use crate::domain::Position;

/// Layers requested when searching for places.
pub const LOCATION_LAYERS: &[&str] = &["station", "venue", "address", "street"];

/// Layers requested when searching for stops.
pub const STOP_LAYERS: &[&str] = &["stop", "station", "street"];

/// A coarse position to bias results towards.
///
/// Coordinates are kept as their two-decimal rendering (roughly 1 km), so
/// nearby positions produce identical queries and share cache entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusPoint {
    pub lat: String,
    pub lon: String,
}

impl FocusPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: format!("{lat:.2}"),
            lon: format!("{lon:.2}"),
        }
    }

    /// Focus point for a position, if location-aware search is enabled and
    /// the position is known.
    pub fn for_position(position: &Position, location_aware: bool) -> Option<Self> {
        (location_aware && position.has_location).then(|| Self::new(position.lat, position.lon))
    }
}

/// One request to the geocoding backend.
///
/// Hashable so that it can key the response cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeocodingQuery {
    pub text: String,
    pub language: String,
    /// Extra backend parameters (boundaries, size, ...).
    pub params: BTreeMap<String, String>,
    pub focus: Option<FocusPoint>,
    /// Comma-separated data sources; empty means backend default.
    pub sources: String,
    pub layers: Vec<String>,
}

impl GeocodingQuery {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            params: BTreeMap::new(),
            focus: None,
            sources: String::new(),
            layers: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn with_focus(mut self, focus: Option<FocusPoint>) -> Self {
        self.focus = focus;
        self
    }

    pub fn with_sources(mut self, sources: impl Into<String>) -> Self {
        self.sources = sources.into();
        self
    }

    pub fn with_layers(mut self, layers: &[&str]) -> Self {
        self.layers = layers.iter().map(|l| l.to_string()).collect();
        self
    }

    /// URL query parameters, in the order the backend documents them.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("text".to_string(), self.text.clone())];
        pairs.extend(self.params.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(focus) = &self.focus {
            pairs.push(("focus.point.lat".to_string(), focus.lat.clone()));
            pairs.push(("focus.point.lon".to_string(), focus.lon.clone()));
        }
        pairs.push(("lang".to_string(), self.language.clone()));
        if !self.sources.is_empty() {
            pairs.push(("sources".to_string(), self.sources.clone()));
        }
        if !self.layers.is_empty() {
            pairs.push(("layers".to_string(), self.layers.join(",")));
        }
        pairs
    }
}
