//! One full search: plan, fetch, merge, rank.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::domain::{RefPoint, ResultItem, Selection, Source, Target};
use crate::geocoding::{FocusPoint, Geocoder};

use super::context::SearchContext;
use super::error::SourceError;
use super::fetchers::{FetchEnv, run_fetcher};
use super::merge::uniq_by_label;
use super::rank::Ranker;
use super::registry::{FetcherKind, plan_fetchers};

/// Parameters of one search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub targets: Selection<Target>,
    pub sources: Selection<Source>,
    pub input: String,
    pub ref_point: RefPoint,
    pub config: Arc<SearchConfig>,
}

impl SearchRequest {
    /// A request searching every target and source.
    pub fn new(input: impl Into<String>, config: Arc<SearchConfig>) -> Self {
        Self {
            targets: Selection::all(),
            sources: Selection::all(),
            input: input.into(),
            ref_point: RefPoint::default(),
            config,
        }
    }

    /// Build a request from raw target and source names. Empty lists select
    /// everything; unknown names select nothing.
    pub fn from_names<T, S>(
        input: impl Into<String>,
        targets: T,
        sources: S,
        config: Arc<SearchConfig>,
    ) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Self::new(input, config)
            .with_targets(Selection::from_names(targets))
            .with_sources(Selection::from_names(sources))
    }

    pub fn with_targets(mut self, targets: Selection<Target>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_sources(mut self, sources: Selection<Source>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_ref_point(mut self, ref_point: RefPoint) -> Self {
        self.ref_point = ref_point;
        self
    }
}

/// Discriminant of a delivered batch. Only whole-result batches exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchKind {
    #[default]
    All,
}

/// The ranked, deduplicated outcome of one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultBatch {
    #[serde(rename = "type")]
    pub kind: BatchKind,
    pub term: String,
    pub results: Vec<ResultItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SourceError>,
    /// Increases with every batch a dispatcher delivers; later batches
    /// supersede earlier ones.
    pub generation: u64,
}

impl SearchResultBatch {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Run every fetcher the request activates, then merge and rank.
///
/// All fetchers run to completion concurrently. If any fails, the batch
/// carries the first error in merge order and no results.
pub async fn get_search_results<C, G, R>(
    context: &C,
    geocoder: &G,
    ranker: &R,
    request: &SearchRequest,
) -> SearchResultBatch
where
    C: SearchContext,
    G: Geocoder,
    R: Ranker,
{
    let config = request.config.as_ref();
    let position = context.position();
    let language = context.language();

    let plan: Vec<FetcherKind> = plan_fetchers(&request.targets, &request.sources)
        .into_iter()
        .filter(|kind| *kind != FetcherKind::CurrentPosition || position.is_supported())
        .collect();

    debug!(
        input = %request.input,
        fetchers = plan.len(),
        "running search"
    );

    let env = FetchEnv {
        context,
        geocoder,
        config,
        input: &request.input,
        ref_point: request.ref_point,
        position: &position,
        language: &language,
        focus: FocusPoint::for_position(&position, config.auto_suggest.location_aware),
    };

    let fetches: Vec<_> = plan.iter().map(|kind| run_fetcher(*kind, &env)).collect();
    let outcomes = join_all(fetches).await;
    let merged: Result<Vec<Vec<ResultItem>>, SourceError> = outcomes.into_iter().collect();

    let (results, error) = match merged {
        Ok(lists) => (uniq_by_label(lists.into_iter().flatten().collect()), None),
        Err(e) => {
            warn!(input = %request.input, error = %e, "search source failed");
            (Vec::new(), Some(e))
        }
    };

    let results = ranker.sort(config, results, &request.input);

    SearchResultBatch {
        kind: BatchKind::All,
        term: request.input.clone(),
        results,
        error,
        generation: 0,
    }
}
