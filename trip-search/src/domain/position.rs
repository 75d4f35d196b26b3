//! Device position and geographic helpers.

use serde::{Deserialize, Serialize};

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in kilometers (haversine).
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let (lat1, lon1) = (self.lat.to_radians(), self.lon.to_radians());
        let (lat2, lon2) = (other.lat.to_radians(), other.lon.to_radians());

        let d_lat = lat2 - lat1;
        let d_lon = lon2 - lon1;

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

/// Geolocation state reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionStatus {
    #[default]
    Unknown,
    Searching,
    Found,
    Denied,
    GeolocationNotSupported,
}

/// The user's current position as known to the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub has_location: bool,
    #[serde(default)]
    pub status: PositionStatus,
}

impl Position {
    /// A position with a known location.
    pub fn located(lat: f64, lon: f64, address: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            address: Some(address.into()),
            has_location: true,
            status: PositionStatus::Found,
        }
    }

    /// Whether geolocation is available at all on this device.
    pub fn is_supported(&self) -> bool {
        self.status != PositionStatus::GeolocationNotSupported
    }
}

/// An optional reference point (usually the chosen origin) used to order
/// nearby stops.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RefPoint {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl RefPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// The point as a coordinate, if both components are set.
    ///
    /// A zero component counts as unset: callers pass `0.0` for "no origin
    /// chosen yet".
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_distance() {
        let helsinki = Coordinate::new(60.1699, 24.9384);
        let tampere = Coordinate::new(61.4978, 23.7610);

        let d = helsinki.distance_km(&tampere);
        assert!((d - 160.0).abs() < 5.0, "got {d}");
        assert_eq!(helsinki.distance_km(&helsinki), 0.0);
    }

    #[test]
    fn ref_point_requires_both_components() {
        assert!(RefPoint::default().coordinate().is_none());
        assert!(
            RefPoint {
                lat: Some(60.0),
                lon: None
            }
            .coordinate()
            .is_none()
        );
        assert!(RefPoint::new(0.0, 24.9).coordinate().is_none());
        assert_eq!(
            RefPoint::new(60.0, 24.9).coordinate(),
            Some(Coordinate::new(60.0, 24.9))
        );
    }

    #[test]
    fn status_serialization() {
        let json = serde_json::to_string(&PositionStatus::GeolocationNotSupported).unwrap();
        assert_eq!(json, "\"geolocation-not-supported\"");
        assert!(!Position {
            status: PositionStatus::GeolocationNotSupported,
            ..Position::default()
        }
        .is_supported());
    }
}
