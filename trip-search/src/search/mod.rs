//! Autosuggest search.
//!
//! A search fans out to every source its targets and sources activate
//! (favourites, history, geocoding, routes), merges the results by label and
//! ranks them. `SearchDispatcher` debounces searches as the user types and
//! delivers each ranked batch through a callback.

mod context;
mod dispatcher;
mod error;
mod fetchers;
mod matcher;
mod merge;
mod pipeline;
mod rank;
mod registry;

#[cfg(test)]
mod pipeline_tests;

pub use context::{HistoryScope, SearchContext};
pub use dispatcher::{DEFAULT_DEBOUNCE, Debouncer, SearchCallback, SearchDispatcher};
pub use error::SourceError;
pub use fetchers::{
    HISTORY_LIMIT, current_position_if_empty, favourite_locations, favourite_stops, geocode,
    gtfs_sources, old_searches,
};
pub use matcher::{FieldLookup, filter_matching_to_input};
pub use merge::uniq_by_label;
pub use pipeline::{BatchKind, SearchRequest, SearchResultBatch, get_search_results};
pub use rank::{DefaultRanker, Ranker, layer_rank};
pub use registry::{Activation, FetcherKind, REGISTRY, plan_fetchers};
