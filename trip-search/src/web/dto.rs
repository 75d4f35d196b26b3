//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::citybikes::{CityBikeNetworkType, NamedNetwork};
use crate::domain::RefPoint;

/// Query for an autosuggest search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Text typed so far
    #[serde(default)]
    pub input: String,

    /// Comma-separated targets (e.g. "Locations,Stops"); all when absent
    pub targets: Option<String>,

    /// Comma-separated sources; all when absent
    pub sources: Option<String>,

    /// Reference point for ordering favourite stops
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl SearchQuery {
    pub fn target_names(&self) -> Vec<&str> {
        split_names(self.targets.as_deref())
    }

    pub fn source_names(&self) -> Vec<&str> {
        split_names(self.sources.as_deref())
    }

    pub fn ref_point(&self) -> RefPoint {
        RefPoint {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

fn split_names(list: Option<&str>) -> Vec<&str> {
    list.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Query for the effective city-bike networks.
#[derive(Debug, Default, Deserialize)]
pub struct NetworksQuery {
    /// The user's comma-separated allow-list, if customised
    pub networks: Option<String>,
}

impl NetworksQuery {
    pub fn customized(&self) -> Option<Vec<String>> {
        self.networks
            .as_deref()
            .map(|list| split_names(Some(list)).into_iter().map(String::from).collect())
    }
}

/// City-bike networks in effect.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworksResponse {
    /// Effective network ids
    pub networks: Vec<String>,

    /// Vehicle type of the primary network
    pub network_type: CityBikeNetworkType,

    /// Every configured network
    pub configured: Vec<NamedNetwork>,
}

/// Request to toggle a network in the user's selection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleNetworkRequest {
    /// Current selection
    #[serde(default)]
    pub current: Vec<String>,

    /// Network to toggle
    pub network: String,

    /// Whether city bikes are among the user's modes
    #[serde(default)]
    pub using_citybike: bool,
}

/// Selection after a toggle.
#[derive(Debug, Serialize)]
pub struct ToggleNetworkResponse {
    pub networks: Vec<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
