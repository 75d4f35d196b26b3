//! Web layer for the trip search service.
//!
//! Exposes the search pipeline and city-bike settings as a JSON API.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, MAX_INPUT_LEN, create_router};
pub use state::AppState;
