//! Search result items.
//!
//! Every source (favourites, history, geocoding, routes) produces the same
//! GeoJSON-like shape: a `type` discriminant, a free-form `properties` map and
//! an optional point geometry. Keeping one shape lets the merge and rank stages
//! treat all sources uniformly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::position::Coordinate;

/// Free-form item properties, keyed by field name.
pub type Properties = serde_json::Map<String, Value>;

/// Layer names attached to result items.
pub mod layer {
    pub const CURRENT_POSITION: &str = "currentPosition";
    pub const FAVOURITE_PLACE: &str = "favouritePlace";
    pub const FAVOURITE_STOP: &str = "favouriteStop";
    pub const FAVOURITE_STATION: &str = "favouriteStation";
    pub const STOP: &str = "stop";
    pub const STATION: &str = "station";
    pub const VENUE: &str = "venue";
    pub const ADDRESS: &str = "address";
    pub const STREET: &str = "street";

    pub const ROUTE_TRAM: &str = "route-TRAM";
    pub const ROUTE_BUS: &str = "route-BUS";
    pub const ROUTE_RAIL: &str = "route-RAIL";
    pub const ROUTE_FERRY: &str = "route-FERRY";

    /// Layers of route results, one per transport mode.
    pub const ROUTE_LAYERS: [&str; 4] = [ROUTE_TRAM, ROUTE_BUS, ROUTE_RAIL, ROUTE_FERRY];

    /// Layers of place-like results.
    pub const LOCATION_LAYERS: [&str; 4] = [FAVOURITE_PLACE, VENUE, ADDRESS, STREET];
}

/// Which source kind produced an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    CurrentLocation,
    FavouritePlace,
    OldSearch,
    Feature,
    Stop,
    Station,
    Route,
}

/// A point geometry with `[lon, lat]` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type", default = "point_type")]
    pub kind: GeometryKind,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
}

fn point_type() -> GeometryKind {
    GeometryKind::Point
}

impl Geometry {
    /// Create a point geometry. Note the GeoJSON `[lon, lat]` order.
    pub fn point(lon: f64, lat: f64) -> Self {
        Self {
            kind: GeometryKind::Point,
            coordinates: [lon, lat],
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.coordinates[1], self.coordinates[0])
    }
}

/// A single search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    #[serde(rename = "type")]
    pub kind: ResultKind,

    #[serde(default)]
    pub properties: Properties,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,

    /// Set when the user opened a timetable from this result. Replayed
    /// history always resets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timetable_clicked: Option<bool>,
}

impl ResultItem {
    /// Create an item with empty properties and no geometry.
    pub fn new(kind: ResultKind) -> Self {
        Self {
            kind,
            properties: Properties::new(),
            geometry: None,
            timetable_clicked: None,
        }
    }

    /// Set a property, builder style.
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Set the geometry, builder style.
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Look up a string property. Non-string values yield `None`.
    pub fn str_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// The semantic layer this item came from.
    pub fn layer(&self) -> Option<&str> {
        self.str_property("layer")
    }

    /// The display label, used for deduplication.
    ///
    /// Falls back through `label`, `name`, `address`, `labelId` (the
    /// current-position item only has that one), then a route's `shortName`
    /// and `longName`.
    pub fn label(&self) -> Option<&str> {
        ["label", "name", "address", "labelId", "shortName", "longName"]
            .into_iter()
            .filter_map(|key| self.str_property(key))
            .find(|s| !s.is_empty())
    }

    /// Geocoder confidence, if the backend supplied one.
    pub fn confidence(&self) -> Option<f64> {
        self.properties.get("confidence").and_then(Value::as_f64)
    }

    /// Position of the item: the geometry when present, else `lat`/`lon`
    /// properties.
    pub fn coordinate(&self) -> Option<Coordinate> {
        if let Some(geometry) = &self.geometry {
            return Some(geometry.coordinate());
        }
        let lat = self.properties.get("lat").and_then(Value::as_f64)?;
        let lon = self.properties.get("lon").and_then(Value::as_f64)?;
        Some(Coordinate::new(lat, lon))
    }
}
