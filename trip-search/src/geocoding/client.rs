//! Pelias geocoding HTTP client.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use crate::domain::ResultItem;

use super::Geocoder;
use super::error::GeocodingError;
use super::query::GeocodingQuery;

/// Header carrying the API subscription key.
const API_KEY_HEADER: &str = "digitransit-subscription-key";

/// Response body of a Pelias search: a GeoJSON feature collection.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<ResultItem>,
}

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct PeliasConfig {
    /// Full URL of the search endpoint
    pub url: String,
    /// Optional API key
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PeliasConfig {
    /// Create a new config for the given endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout_secs: 10,
        }
    }

    /// Set an API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for a Pelias-compatible geocoding API.
#[derive(Debug, Clone)]
pub struct PeliasClient {
    http: reqwest::Client,
    url: String,
}

impl PeliasClient {
    /// Create a new geocoding client.
    pub fn new(config: PeliasConfig) -> Result<Self, GeocodingError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| GeocodingError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// Run a search against the backend.
    pub async fn search(&self, query: &GeocodingQuery) -> Result<Vec<ResultItem>, GeocodingError> {
        let response = self
            .http
            .get(&self.url)
            .query(&query.to_query_pairs())
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let features = parse_features(&body)?;

        debug!(text = %query.text, count = features.len(), "geocoding response");
        Ok(features)
    }
}

impl Geocoder for PeliasClient {
    async fn resolve(&self, query: &GeocodingQuery) -> Result<Vec<ResultItem>, GeocodingError> {
        self.search(query).await
    }
}

/// Parse a feature collection body.
fn parse_features(body: &str) -> Result<Vec<ResultItem>, GeocodingError> {
    serde_json::from_str::<FeatureCollection>(body)
        .map(|collection| collection.features)
        .map_err(|e| GeocodingError::Json {
            message: e.to_string(),
        })
}
