//! In-memory search context.
//!
//! Holds a user's favourites and search history together with a small transit
//! catalogue (stops, stations and routes). Loaded from a JSON snapshot such as:
//!
//! ```json
//! {
//!   "language": "fi",
//!   "favouriteLocations": [{ "name": "Home", "address": "Opastinsilta 6", "lat": 60.19, "lon": 24.93 }],
//!   "favouriteStops": [{ "gtfsId": "HSL:1000103", "type": "stop" }],
//!   "stops": [{ "type": "Stop", "properties": { "gtfsId": "HSL:1000103", "name": "Kauppatori" } }]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::config::SearchConfig;
use crate::domain::{
    FavouriteLocation, FavouriteStop, Position, ResultItem, ResultKind, StopKind, layer,
};
use crate::search::{HistoryScope, SearchContext, SourceError, filter_matching_to_input};

use super::error::StoreError;

const ROUTE_FIELDS: &[&str] = &["properties.shortName", "properties.longName"];

fn default_language() -> String {
    "fi".to_string()
}

/// A search context backed by plain collections.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryContext {
    position: Position,
    #[serde(default = "default_language")]
    language: String,
    favourite_locations: Vec<FavouriteLocation>,
    favourite_stops: Vec<FavouriteStop>,
    /// Stop and station catalogue, keyed by `properties.gtfsId`.
    stops: Vec<ResultItem>,
    /// Searches made from the origin and destination fields.
    endpoint_history: Vec<ResultItem>,
    /// Every other stored search.
    history: Vec<ResultItem>,
    /// Ids of saved routes.
    favourite_routes: Vec<String>,
    /// Route catalogue, keyed by `properties.gtfsId`.
    routes: Vec<ResultItem>,
}

impl Default for MemoryContext {
    fn default() -> Self {
        Self {
            position: Position::default(),
            language: default_language(),
            favourite_locations: Vec::new(),
            favourite_stops: Vec::new(),
            stops: Vec::new(),
            endpoint_history: Vec::new(),
            history: Vec::new(),
            favourite_routes: Vec::new(),
            routes: Vec::new(),
        }
    }
}

impl MemoryContext {
    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let context: MemoryContext = serde_json::from_str(&json)?;

        debug!(
            path = %path.display(),
            favourites = context.favourite_locations.len(),
            stops = context.stops.len(),
            routes = context.routes.len(),
            "loaded search data"
        );
        Ok(context)
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_favourite_locations(mut self, favourites: Vec<FavouriteLocation>) -> Self {
        self.favourite_locations = favourites;
        self
    }

    pub fn with_favourite_stops(mut self, favourites: Vec<FavouriteStop>) -> Self {
        self.favourite_stops = favourites;
        self
    }

    pub fn with_stops(mut self, stops: Vec<ResultItem>) -> Self {
        self.stops = stops;
        self
    }

    pub fn with_endpoint_history(mut self, history: Vec<ResultItem>) -> Self {
        self.endpoint_history = history;
        self
    }

    pub fn with_history(mut self, history: Vec<ResultItem>) -> Self {
        self.history = history;
        self
    }

    pub fn with_favourite_routes(mut self, ids: Vec<String>) -> Self {
        self.favourite_routes = ids;
        self
    }

    pub fn with_routes(mut self, routes: Vec<ResultItem>) -> Self {
        self.routes = routes;
        self
    }
}

fn gtfs_id(item: &ResultItem) -> Option<&str> {
    item.str_property("gtfsId")
}

/// Whether a route belongs to one of the configured feeds. `HSL:1009`
/// belongs to feed `HSL`; no configured feeds means every feed.
fn in_feeds(item: &ResultItem, feed_ids: &[String]) -> bool {
    if feed_ids.is_empty() {
        return true;
    }
    gtfs_id(item)
        .and_then(|id| id.split_once(':'))
        .is_some_and(|(feed, _)| feed_ids.iter().any(|f| f == feed))
}

impl SearchContext for MemoryContext {
    fn position(&self) -> Position {
        self.position.clone()
    }

    fn language(&self) -> String {
        self.language.clone()
    }

    fn favourite_locations(&self) -> Vec<FavouriteLocation> {
        self.favourite_locations.clone()
    }

    fn favourite_stops(&self) -> Vec<FavouriteStop> {
        self.favourite_stops.clone()
    }

    fn old_searches(&self, scope: HistoryScope) -> Vec<ResultItem> {
        match scope {
            HistoryScope::Endpoint => self.endpoint_history.clone(),
            HistoryScope::All => self
                .endpoint_history
                .iter()
                .chain(&self.history)
                .cloned()
                .collect(),
        }
    }

    async fn stops_and_stations(&self, favourites: Vec<FavouriteStop>) -> Result<Vec<ResultItem>, SourceError> {
        let mut resolved = Vec::with_capacity(favourites.len());

        for favourite in favourites {
            let Some(found) = self
                .stops
                .iter()
                .find(|item| gtfs_id(item) == Some(favourite.gtfs_id.as_str()))
            else {
                debug!(gtfs_id = %favourite.gtfs_id, "favourite stop not in catalogue");
                continue;
            };

            let (kind, layer) = match favourite.kind {
                StopKind::Stop => (ResultKind::Stop, layer::FAVOURITE_STOP),
                StopKind::Station => (ResultKind::Station, layer::FAVOURITE_STATION),
            };
            let mut item = found.clone();
            item.kind = kind;
            item.properties.insert("layer".to_string(), layer.into());
            if let Some(name) = favourite.name {
                item.properties.insert("name".to_string(), name.clone().into());
                item.properties.insert("label".to_string(), name.into());
            }
            resolved.push(item);
        }

        Ok(resolved)
    }

    fn stored_favourite_routes(&self) -> Vec<String> {
        self.favourite_routes.clone()
    }

    async fn favourite_routes(&self, stored: Vec<String>, input: &str) -> Result<Vec<ResultItem>, SourceError> {
        let saved: Vec<ResultItem> = self
            .routes
            .iter()
            .filter(|route| gtfs_id(route).is_some_and(|id| stored.iter().any(|s| s == id)))
            .cloned()
            .collect();

        Ok(filter_matching_to_input(saved, input, ROUTE_FIELDS))
    }

    async fn routes(&self, input: &str, config: &SearchConfig) -> Result<Vec<ResultItem>, SourceError> {
        if input.trim().is_empty() {
            return Ok(Vec::new());
        }

        let candidates: Vec<ResultItem> = self
            .routes
            .iter()
            .filter(|route| in_feeds(route, &config.feed_ids))
            .cloned()
            .collect();

        Ok(filter_matching_to_input(candidates, input, ROUTE_FIELDS))
    }
}
