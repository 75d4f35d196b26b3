//! Which fetchers run for which (target, source) combination.

use crate::domain::{Selection, Source, Target, layer};

use super::context::HistoryScope;

/// A fetcher variant. Each produces results for one logical source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetcherKind {
    CurrentPosition,
    FavouriteLocations,
    LocationGeocoding,
    LocationHistory,
    FavouriteStops,
    StopGeocoding,
    StopHistory,
    FavouriteRoutes,
    Routes,
    RouteHistory,
}

impl FetcherKind {
    /// History slice and excluded layers, for history fetchers.
    pub fn history(&self) -> Option<(HistoryScope, Vec<&'static str>)> {
        match self {
            FetcherKind::LocationHistory => {
                let mut excluded = vec![layer::CURRENT_POSITION, layer::STOP];
                excluded.extend(layer::ROUTE_LAYERS);
                Some((HistoryScope::Endpoint, excluded))
            }
            FetcherKind::StopHistory => {
                let mut excluded = vec![layer::CURRENT_POSITION, layer::FAVOURITE_PLACE];
                excluded.extend(layer::ROUTE_LAYERS);
                excluded.extend(layer::LOCATION_LAYERS);
                Some((HistoryScope::All, excluded))
            }
            FetcherKind::RouteHistory => {
                let mut excluded = vec![
                    layer::CURRENT_POSITION,
                    layer::FAVOURITE_PLACE,
                    layer::STOP,
                    layer::STATION,
                ];
                excluded.extend(layer::LOCATION_LAYERS);
                Some((HistoryScope::All, excluded))
            }
            _ => None,
        }
    }
}

/// One row of the activation table.
#[derive(Debug, Clone, Copy)]
pub struct Activation {
    pub target: Target,
    /// Only when the target is named explicitly, never via the wildcard.
    pub explicit_target: bool,
    /// `None` activates regardless of the source selection.
    pub source: Option<Source>,
    pub fetcher: FetcherKind,
}

const fn row(target: Target, source: Option<Source>, fetcher: FetcherKind) -> Activation {
    Activation {
        target,
        explicit_target: false,
        source,
        fetcher,
    }
}

/// Activation table. Row order is the order results are merged in.
pub const REGISTRY: &[Activation] = &[
    Activation {
        target: Target::CurrentPosition,
        explicit_target: true,
        source: None,
        fetcher: FetcherKind::CurrentPosition,
    },
    row(Target::Locations, Some(Source::Favourite), FetcherKind::FavouriteLocations),
    row(Target::Locations, Some(Source::Datasource), FetcherKind::LocationGeocoding),
    row(Target::Locations, Some(Source::History), FetcherKind::LocationHistory),
    row(Target::Stops, Some(Source::Favourite), FetcherKind::FavouriteStops),
    row(Target::Stops, Some(Source::Datasource), FetcherKind::StopGeocoding),
    row(Target::Stops, Some(Source::History), FetcherKind::StopHistory),
    row(Target::Routes, Some(Source::Favourites), FetcherKind::FavouriteRoutes),
    row(Target::Routes, None, FetcherKind::Routes),
    row(Target::Routes, Some(Source::History), FetcherKind::RouteHistory),
];

/// The fetchers to run for a selection, in merge order.
pub fn plan_fetchers(targets: &Selection<Target>, sources: &Selection<Source>) -> Vec<FetcherKind> {
    REGISTRY
        .iter()
        .filter(|row| {
            if row.explicit_target {
                targets.names_explicitly(row.target)
            } else {
                targets.includes(row.target)
            }
        })
        .filter(|row| row.source.is_none_or(|source| sources.includes(source)))
        .map(|row| row.fetcher)
        .collect()
}
