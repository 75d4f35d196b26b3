//! Caller-supplied data access for a search.

use std::future::Future;

use crate::config::SearchConfig;
use crate::domain::{FavouriteLocation, FavouriteStop, Position, ResultItem};

use super::error::SourceError;

/// Which slice of the search history to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryScope {
    /// Searches made from the origin/destination fields.
    Endpoint,
    /// Every stored search.
    All,
}

/// Read access to the user's stores and the transit data backend.
///
/// The search core only reads through this trait. Implementations carry
/// whatever handle they need (store connections, API clients, the current
/// user) and must tolerate concurrent calls.
pub trait SearchContext: Send + Sync {
    /// Current device position.
    fn position(&self) -> Position;

    /// UI language, e.g. `"fi"`.
    fn language(&self) -> String;

    /// Saved favourite places.
    fn favourite_locations(&self) -> Vec<FavouriteLocation>;

    /// Saved favourite stops and stations.
    fn favourite_stops(&self) -> Vec<FavouriteStop>;

    /// Previous searches, newest first.
    fn old_searches(&self, scope: HistoryScope) -> Vec<ResultItem>;

    /// Resolve favourite stop references to full stop/station items.
    fn stops_and_stations(
        &self,
        favourites: Vec<FavouriteStop>,
    ) -> impl Future<Output = Result<Vec<ResultItem>, SourceError>> + Send;

    /// Ids of the routes the user has saved.
    fn stored_favourite_routes(&self) -> Vec<String>;

    /// Resolve saved routes matching `input`.
    fn favourite_routes(
        &self,
        stored: Vec<String>,
        input: &str,
    ) -> impl Future<Output = Result<Vec<ResultItem>, SourceError>> + Send;

    /// Routes matching `input`.
    fn routes(
        &self,
        input: &str,
        config: &SearchConfig,
    ) -> impl Future<Output = Result<Vec<ResultItem>, SourceError>> + Send;
}
