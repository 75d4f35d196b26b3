//! Search configuration.
//!
//! Mirrors the installation config the front-end ships with: geocoding
//! endpoint, enabled feeds, autosuggest behaviour, match patterns and
//! city-bike networks. Loaded from JSON, with a few environment overrides.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::citybikes::NetworkConfig;

/// Default geocoding endpoint.
const DEFAULT_PELIAS_URL: &str = "https://api.digitransit.fi/geocoding/v1/search";

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for this schema
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A pattern override does not compile
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A compiled regular expression that (de)serializes as its source string.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}

/// Backend endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
pub struct Urls {
    /// Geocoding search endpoint.
    pub pelias: String,
}

impl Default for Urls {
    fn default() -> Self {
        Self {
            pelias: DEFAULT_PELIAS_URL.to_string(),
        }
    }
}

/// Autosuggest behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoSuggest {
    /// Send a coarse focus point with geocoding queries.
    pub location_aware: bool,
}

/// Query patterns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchPatterns {
    /// Queries not matching this are never sent to the geocoder.
    pub minimal_regexp: Option<Pattern>,

    /// Queries matching this look like route numbers.
    pub line_regexp: Option<Pattern>,
}

/// City-bike settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CityBikeConfig {
    /// Known networks, keyed by lower-case network id.
    pub networks: BTreeMap<String, NetworkConfig>,
}

/// Configuration for the search core. Read-only once built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Backend endpoints.
    #[serde(rename = "URL")]
    pub url: Urls,

    /// Enabled GTFS feed ids. Stop geocoding is restricted to these.
    pub feed_ids: Vec<String>,

    /// Geocoding sources for location search.
    pub search_sources: Vec<String>,

    pub auto_suggest: AutoSuggest,

    pub search: SearchPatterns,

    /// Extra geocoding parameters for location search (e.g. boundary).
    pub search_params: BTreeMap<String, String>,

    pub city_bike: CityBikeConfig,
}

impl SearchConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Apply overrides from the environment.
    ///
    /// * `PELIAS_URL` - geocoding endpoint
    /// * `FEED_IDS` - comma-separated feed ids
    /// * `LOCATION_AWARE` - `true`/`1` to enable the focus point
    /// * `MINIMAL_REGEXP` - minimal query pattern
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(url) = std::env::var("PELIAS_URL") {
            self.url.pelias = url;
        }
        if let Ok(ids) = std::env::var("FEED_IDS") {
            self.feed_ids = split_list(&ids);
        }
        if let Ok(flag) = std::env::var("LOCATION_AWARE") {
            self.auto_suggest.location_aware = matches!(flag.as_str(), "true" | "1");
        }
        if let Ok(pattern) = std::env::var("MINIMAL_REGEXP") {
            self.search.minimal_regexp = Some(Pattern::new(&pattern)?);
        }
        Ok(self)
    }

    /// Set the geocoding endpoint.
    pub fn with_pelias_url(mut self, url: impl Into<String>) -> Self {
        self.url.pelias = url.into();
        self
    }

    /// Set the enabled feed ids.
    pub fn with_feed_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feed_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the geocoding sources for location search.
    pub fn with_search_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable the geocoding focus point.
    pub fn with_location_aware(mut self, enabled: bool) -> Self {
        self.auto_suggest.location_aware = enabled;
        self
    }

    /// Set the minimal query pattern.
    pub fn with_minimal_regexp(mut self, pattern: Pattern) -> Self {
        self.search.minimal_regexp = Some(pattern);
        self
    }

    /// Set the route-number pattern.
    pub fn with_line_regexp(mut self, pattern: Pattern) -> Self {
        self.search.line_regexp = Some(pattern);
        self
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
