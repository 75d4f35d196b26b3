//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{debug, warn};

use crate::citybikes::{
    citybike_networks, citybike_type, map_default_network_properties, update_citybike_networks,
};
use crate::geocoding::Geocoder;
use crate::search::{SearchRequest, SearchResultBatch, get_search_results};

use super::dto::*;
use super::state::AppState;

/// Longest accepted search input, in characters.
pub const MAX_INPUT_LEN: usize = 200;

/// Create the application router.
pub fn create_router<G: Geocoder + 'static>(state: AppState<G>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search::<G>))
        .route(
            "/api/citybike/networks",
            get(citybike_networks_handler::<G>).post(toggle_network::<G>),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Run one search. Debouncing is left to the client.
async fn search<G: Geocoder + 'static>(
    State(state): State<AppState<G>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResultBatch>, AppError> {
    if query.input.chars().count() > MAX_INPUT_LEN {
        return Err(AppError::BadRequest {
            message: format!("input longer than {MAX_INPUT_LEN} characters"),
        });
    }

    let request = SearchRequest::from_names(
        query.input.clone(),
        query.target_names(),
        query.source_names(),
        state.config.clone(),
    )
    .with_ref_point(query.ref_point());

    let batch = get_search_results(
        state.context.as_ref(),
        state.geocoder.as_ref(),
        &state.ranker,
        &request,
    )
    .await;

    if let Some(error) = &batch.error {
        return Err(AppError::Upstream {
            message: error.to_string(),
        });
    }

    debug!(input = %batch.term, results = batch.results.len(), "search served");
    Ok(Json(batch))
}

/// Effective city-bike networks for a user's allow-list.
async fn citybike_networks_handler<G: Geocoder + 'static>(
    State(state): State<AppState<G>>,
    Query(query): Query<NetworksQuery>,
) -> Json<NetworksResponse> {
    let customized = query.customized();
    let networks = citybike_networks(&state.config, customized.as_deref());
    let network_type = citybike_type(&networks, &state.config);

    Json(NetworksResponse {
        networks,
        network_type,
        configured: map_default_network_properties(&state.config),
    })
}

/// Toggle one network in the user's selection.
async fn toggle_network<G: Geocoder + 'static>(
    State(state): State<AppState<G>>,
    Json(req): Json<ToggleNetworkRequest>,
) -> Result<Json<ToggleNetworkResponse>, AppError> {
    if req.network.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "network must not be empty".to_string(),
        });
    }

    let networks = update_citybike_networks(
        &req.current,
        &req.network,
        &state.config,
        req.using_citybike,
        state.analytics.as_ref(),
    );
    Ok(Json(ToggleNetworkResponse { networks }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Upstream { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
