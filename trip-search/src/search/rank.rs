//! Result ranking.
//!
//! Ranks merged results so that the most likely pick comes first.

use std::cmp::Ordering;

use crate::config::SearchConfig;
use crate::domain::{ResultItem, layer};

/// Orders a merged result list for a search term.
pub trait Ranker: Send + Sync {
    fn sort(&self, config: &SearchConfig, results: Vec<ResultItem>, term: &str) -> Vec<ResultItem>;
}

/// The standard ranking.
///
/// Results are ranked by:
/// 1. Route-number match (when the term looks like a line and the route's
///    short name prefixes it)
/// 2. Score: layer priority for an empty term, else backend confidence.
///    Results without confidence (history, favourites) score above every
///    geocoded result.
/// 3. Label, alphabetically
///
/// The sort is stable, so equal results keep their merge order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRanker;

impl Ranker for DefaultRanker {
    fn sort(&self, config: &SearchConfig, mut results: Vec<ResultItem>, term: &str) -> Vec<ResultItem> {
        let term = term.to_lowercase();
        let is_line_search = config
            .search
            .line_regexp
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(&term));

        results.sort_by(|a, b| {
            // Primary: route-number match, descending
            let line_cmp = line_match(b, &term, is_line_search).cmp(&line_match(a, &term, is_line_search));
            if line_cmp != Ordering::Equal {
                return line_cmp;
            }

            // Secondary: score, descending
            let score_cmp = score(b, &term).total_cmp(&score(a, &term));
            if score_cmp != Ordering::Equal {
                return score_cmp;
            }

            // Tertiary: label
            a.label().unwrap_or("").cmp(b.label().unwrap_or(""))
        });

        results
    }
}

/// Priority of a layer when there is no term to match against.
pub fn layer_rank(layer: Option<&str>, source: Option<&str>) -> f64 {
    match layer {
        Some(layer::CURRENT_POSITION) => 1.0,
        Some(layer::FAVOURITE_STATION) => 0.45,
        Some(layer::FAVOURITE_PLACE) => 0.44,
        Some(layer::FAVOURITE_STOP) => 0.43,
        Some(layer::STATION) => {
            if source.is_some_and(|s| s.starts_with("gtfs")) {
                0.41
            } else {
                0.38
            }
        }
        _ => 0.4,
    }
}

fn score(item: &ResultItem, term: &str) -> f64 {
    let rank = layer_rank(item.layer(), item.str_property("source"));
    if term.is_empty() {
        return rank;
    }
    match item.confidence() {
        Some(confidence) => confidence,
        None => 1.0 + rank,
    }
}

fn line_match(item: &ResultItem, term: &str, is_line_search: bool) -> bool {
    is_line_search
        && item
            .str_property("shortName")
            .is_some_and(|short| term.starts_with(&short.to_lowercase()))
}
