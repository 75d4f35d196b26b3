use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trip_search::config::SearchConfig;
use trip_search::geocoding::{CacheConfig, CachedGeocoder, PeliasClient, PeliasConfig};
use trip_search::store::MemoryContext;
use trip_search::web::{AppState, create_router};

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Search configuration: file if given, then environment overrides
    let config = match std::env::var("SEARCH_CONFIG") {
        Ok(path) => SearchConfig::load(&path).expect("Failed to load search config"),
        Err(_) => SearchConfig::default(),
    }
    .with_env_overrides()
    .expect("Invalid search config override");

    // User data snapshot
    let context = match std::env::var("SEARCH_DATA") {
        Ok(path) => MemoryContext::load(&path).expect("Failed to load search data"),
        Err(_) => {
            warn!("SEARCH_DATA not set. Serving without favourites or history.");
            MemoryContext::default()
        }
    };

    // Create geocoding client
    let mut pelias_config = PeliasConfig::new(&config.url.pelias);
    if let Ok(key) = std::env::var("PELIAS_API_KEY") {
        pelias_config = pelias_config.with_api_key(key);
    }
    let pelias = PeliasClient::new(pelias_config).expect("Failed to create geocoding client");

    // Create cached geocoder
    let geocoder = CachedGeocoder::new(pelias, &CacheConfig::default());

    let state = AppState::new(context, geocoder, config);
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .expect("Invalid BIND_ADDR");

    info!(%addr, "trip search listening");
    info!("GET  /health                 - Health check");
    info!("GET  /api/search             - Autosuggest search");
    info!("GET  /api/citybike/networks  - Effective city-bike networks");
    info!("POST /api/citybike/networks  - Toggle a city-bike network");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
