//! City-bike network configuration.
//!
//! Networks are configured per installation; users may narrow them down in
//! their itinerary settings. Network ids are matched case-insensitively since
//! older settings stored them upper-cased.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEmitter, AnalyticsEvent};
use crate::config::SearchConfig;

pub const BIKESTATION_ON: &str = "Station on";
pub const BIKESTATION_OFF: &str = "Station off";
pub const BIKESTATION_CLOSED: &str = "Station closed";

pub const BIKEAVL_UNKNOWN: &str = "No availability";
pub const BIKEAVL_BIKES: &str = "Bikes on station";
pub const BIKEAVL_WITHMAX: &str = "Bikes and capacity";

/// Analytics category for settings changes.
const SETTINGS_CATEGORY: &str = "ItinerarySettings";

/// Kind of vehicle a network rents out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CityBikeNetworkType {
    #[default]
    CityBike,
    Scooter,
}

/// Per-network settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub icon: Option<String>,
    /// Display name by language.
    pub name: BTreeMap<String, String>,
    #[serde(rename = "type")]
    pub network_type: CityBikeNetworkType,
    /// Info page by language.
    pub url: BTreeMap<String, String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            icon: Some("citybike".to_string()),
            name: BTreeMap::new(),
            network_type: CityBikeNetworkType::CityBike,
            url: BTreeMap::new(),
        }
    }
}

/// A network config tagged with its id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedNetwork {
    pub network_name: String,
    #[serde(flatten)]
    pub config: NetworkConfig,
}

/// Localised network name.
pub fn network_name<'a>(config: &'a NetworkConfig, language: &str) -> Option<&'a str> {
    config.name.get(language).map(String::as_str)
}

/// Icon id for a network.
pub fn network_icon(config: &NetworkConfig) -> String {
    format!("icon-icon_{}", config.icon.as_deref().unwrap_or("citybike"))
}

/// The primary network of a selection.
pub fn network_id(networks: &[String]) -> Option<&str> {
    networks.first().map(String::as_str).filter(|id| !id.is_empty())
}

/// Look up a network's config, falling back to the default.
pub fn network_config(network_id: &str, config: &SearchConfig) -> NetworkConfig {
    config
        .city_bike
        .networks
        .get(&network_id.to_lowercase())
        .cloned()
        .unwrap_or_default()
}

/// Ids of all configured networks.
pub fn default_networks(config: &SearchConfig) -> Vec<String> {
    config.city_bike.networks.keys().cloned().collect()
}

/// All configured networks with their ids.
pub fn map_default_network_properties(config: &SearchConfig) -> Vec<NamedNetwork> {
    config
        .city_bike
        .networks
        .iter()
        .map(|(id, network)| NamedNetwork {
            network_name: id.clone(),
            config: network.clone(),
        })
        .collect()
}

/// The networks in effect: the user's allow-list if they have one,
/// otherwise every configured network.
pub fn citybike_networks(config: &SearchConfig, customized: Option<&[String]>) -> Vec<String> {
    match customized {
        Some(allowed) if !allowed.is_empty() => allowed.to_vec(),
        _ => default_networks(config),
    }
}

/// Toggle `new_value` in the user's network selection.
///
/// When city bikes are in use the value is added, or removed if already
/// present (along with its upper-cased legacy spelling). Removing the last
/// network resets to the defaults. When city bikes are not in use the
/// selection becomes just `new_value`. Each outcome emits an analytics event.
pub fn update_citybike_networks(
    current: &[String],
    new_value: &str,
    config: &SearchConfig,
    is_using_citybike: bool,
    emitter: &dyn AnalyticsEmitter,
) -> Vec<String> {
    let chosen: Vec<String> = if is_using_citybike {
        let present = current
            .iter()
            .any(|network| network.to_lowercase() == new_value.to_lowercase());
        if present {
            let legacy = new_value.to_uppercase();
            current
                .iter()
                .filter(|network| network.as_str() != new_value && **network != legacy)
                .cloned()
                .collect()
        } else {
            let mut chosen = current.to_vec();
            chosen.push(new_value.to_string());
            chosen
        }
    } else {
        vec![new_value.to_string()]
    };

    if chosen.is_empty() {
        emitter.emit(AnalyticsEvent::new(
            SETTINGS_CATEGORY,
            "SettingsResetCityBikeNetwork",
            None,
        ));
        return default_networks(config);
    }

    if !is_using_citybike {
        emitter.emit(AnalyticsEvent::new(
            SETTINGS_CATEGORY,
            "SettingsNotUsingCityBikeNetwork",
            None,
        ));
        return chosen;
    }

    let direction = if current.len() > chosen.len() {
        "Disable"
    } else {
        "Enable"
    };
    emitter.emit(AnalyticsEvent::new(
        SETTINGS_CATEGORY,
        format!("Settings{direction}CityBikeNetwork"),
        Some(new_value.to_string()),
    ));

    chosen
}

/// Network-specific info URL for a language.
pub fn citybike_url(networks: &[String], language: &str, config: &SearchConfig) -> Option<String> {
    let id = network_id(networks)?.to_lowercase();
    config
        .city_bike
        .networks
        .get(&id)
        .and_then(|network| network.url.get(language))
        .cloned()
}

/// Vehicle type of the primary network, defaulting to city bikes.
pub fn citybike_type(networks: &[String], config: &SearchConfig) -> CityBikeNetworkType {
    network_id(networks)
        .and_then(|id| config.city_bike.networks.get(&id.to_lowercase()))
        .map(|network| network.network_type)
        .unwrap_or_default()
}
