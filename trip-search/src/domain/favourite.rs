//! Saved favourites, as handed over by the favourites store.

use serde::{Deserialize, Serialize};

use super::item::Properties;

/// A favourite place (home, work, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteLocation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub lat: f64,
    pub lon: f64,
    /// Any further fields the store keeps (ids, icons, ...). Copied verbatim
    /// into result properties.
    #[serde(flatten)]
    pub extra: Properties,
}

impl FavouriteLocation {
    pub fn new(name: impl Into<String>, address: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            address: Some(address.into()),
            lat,
            lon,
            extra: Properties::new(),
        }
    }
}

/// Whether a favourite stop refers to a single stop or a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    #[default]
    Stop,
    Station,
}

/// A favourite stop or station reference. Resolved to full result items by
/// the context's stop lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteStop {
    pub gtfs_id: String,
    #[serde(rename = "type", default)]
    pub kind: StopKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extra_fields_are_kept() {
        let value = json!({
            "name": "Home",
            "address": "Opastinsilta 6, Helsinki",
            "lat": 60.199,
            "lon": 24.94,
            "favouriteId": "abc-123",
            "selectedIconId": "icon-icon_home"
        });
        let fav: FavouriteLocation = serde_json::from_value(value).unwrap();

        assert_eq!(fav.name, "Home");
        assert_eq!(fav.extra.len(), 2);
        assert_eq!(fav.extra["favouriteId"], "abc-123");
    }

    #[test]
    fn stop_kind_defaults_to_stop() {
        let stop: FavouriteStop = serde_json::from_value(json!({ "gtfsId": "HSL:1040601" })).unwrap();
        assert_eq!(stop.kind, StopKind::Stop);

        let station: FavouriteStop =
            serde_json::from_value(json!({ "gtfsId": "HSL:1000003", "type": "station" })).unwrap();
        assert_eq!(station.kind, StopKind::Station);
    }
}
