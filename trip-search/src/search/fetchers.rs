//! Per-source result fetchers.
//!
//! Each fetcher turns one source's raw data into normalized result items.
//! `run_fetcher` dispatches on `FetcherKind`; the pure helpers below do the
//! source-specific filtering and ordering.

use serde_json::Value;
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::domain::{
    Coordinate, FavouriteLocation, Geometry, Position, RefPoint, ResultItem, ResultKind, layer,
};
use crate::geocoding::{FocusPoint, Geocoder, GeocodingQuery, LOCATION_LAYERS, STOP_LAYERS};

use super::context::SearchContext;
use super::error::SourceError;
use super::matcher::filter_matching_to_input;
use super::registry::FetcherKind;

/// Maximum number of history entries returned per search.
pub const HISTORY_LIMIT: usize = 10;

/// Fields matched for favourite places.
const FAVOURITE_FIELDS: &[&str] = &["address", "name"];

/// Fields matched for stops and stations.
const STOP_FIELDS: &[&str] = &["properties.name", "properties.address"];

/// Fields matched for history entries.
const HISTORY_FIELDS: &[&str] = &[
    "properties.name",
    "properties.label",
    "properties.address",
    "properties.shortName",
    "properties.longName",
];

/// Everything a fetcher may need, resolved once per search.
pub struct FetchEnv<'a, C, G> {
    pub context: &'a C,
    pub geocoder: &'a G,
    pub config: &'a SearchConfig,
    pub input: &'a str,
    pub ref_point: RefPoint,
    pub position: &'a Position,
    pub language: &'a str,
    pub focus: Option<FocusPoint>,
}

/// Run one fetcher.
pub async fn run_fetcher<C, G>(kind: FetcherKind, env: &FetchEnv<'_, C, G>) -> Result<Vec<ResultItem>, SourceError>
where
    C: SearchContext,
    G: Geocoder,
{
    let ctx = env.context;
    let results = match kind {
        FetcherKind::CurrentPosition => current_position_if_empty(env.input, env.position),
        FetcherKind::FavouriteLocations => favourite_locations(ctx.favourite_locations(), env.input),
        FetcherKind::LocationGeocoding => {
            let query = GeocodingQuery::new(env.input, env.language)
                .with_params(env.config.search_params.clone())
                .with_focus(env.focus.clone())
                .with_sources(env.config.search_sources.join(","))
                .with_layers(LOCATION_LAYERS);
            geocode(env.geocoder, &query, env.config).await?
        }
        FetcherKind::FavouriteStops => {
            let stops = ctx.stops_and_stations(ctx.favourite_stops()).await?;
            favourite_stops(stops, env.input, env.ref_point)
        }
        FetcherKind::StopGeocoding => {
            let query = GeocodingQuery::new(env.input, env.language)
                .with_focus(env.focus.clone())
                .with_sources(gtfs_sources(&env.config.feed_ids))
                .with_layers(STOP_LAYERS);
            geocode(env.geocoder, &query, env.config).await?
        }
        FetcherKind::LocationHistory | FetcherKind::StopHistory | FetcherKind::RouteHistory => {
            let Some((scope, excluded)) = kind.history() else {
                return Ok(Vec::new());
            };
            old_searches(ctx.old_searches(scope), env.input, &excluded)
        }
        FetcherKind::FavouriteRoutes => {
            let routes = ctx
                .favourite_routes(ctx.stored_favourite_routes(), env.input)
                .await?;
            labelled_routes(routes)
        }
        FetcherKind::Routes => labelled_routes(ctx.routes(env.input, env.config).await?),
    };

    trace!(?kind, count = results.len(), "fetcher complete");
    Ok(results)
}

/// The synthetic "use my position" item, offered only before anything is typed.
pub fn current_position_if_empty(input: &str, position: &Position) -> Vec<ResultItem> {
    if !input.is_empty() {
        return Vec::new();
    }

    let mut item = ResultItem::new(ResultKind::CurrentLocation)
        .with_property("labelId", "use-own-position")
        .with_property("layer", layer::CURRENT_POSITION)
        .with_property("lat", position.lat)
        .with_property("lon", position.lon)
        .with_geometry(Geometry::point(position.lon, position.lat));
    if let Some(address) = &position.address {
        item = item.with_property("address", address.as_str());
    }

    vec![item]
}

/// Matching favourite places, sorted by name.
pub fn favourite_locations(favourites: Vec<FavouriteLocation>, input: &str) -> Vec<ResultItem> {
    let mut matched = filter_matching_to_input(favourites, input, FAVOURITE_FIELDS);
    matched.sort_by(|a, b| a.name.cmp(&b.name));

    matched.into_iter().map(favourite_place_item).collect()
}

fn favourite_place_item(favourite: FavouriteLocation) -> ResultItem {
    let geometry = Geometry::point(favourite.lon, favourite.lat);
    let label = favourite.name.clone();

    let mut properties = favourite.extra;
    properties.insert("name".to_string(), Value::from(favourite.name));
    if let Some(address) = favourite.address {
        properties.insert("address".to_string(), Value::from(address));
    }
    properties.insert("lat".to_string(), Value::from(favourite.lat));
    properties.insert("lon".to_string(), Value::from(favourite.lon));
    properties.insert("label".to_string(), Value::from(label));
    properties.insert("layer".to_string(), Value::from(layer::FAVOURITE_PLACE));

    ResultItem {
        kind: ResultKind::FavouritePlace,
        properties,
        geometry: Some(geometry),
        timetable_clicked: None,
    }
}

/// Matching favourite stops, nearest first when a reference point is set.
///
/// Stops without a known position sort last.
pub fn favourite_stops(stops: Vec<ResultItem>, input: &str, ref_point: RefPoint) -> Vec<ResultItem> {
    let mut matched = filter_matching_to_input(stops, input, STOP_FIELDS);

    if let Some(origin) = ref_point.coordinate() {
        let distance = |item: &ResultItem| {
            item.coordinate()
                .map_or(f64::INFINITY, |c: Coordinate| origin.distance_km(&c))
        };
        matched.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
    }

    matched
}

/// Give every route a display label of its short and long name, so routes
/// sharing a number stay distinct after deduplication. Existing labels are
/// kept.
pub fn labelled_routes(routes: Vec<ResultItem>) -> Vec<ResultItem> {
    routes
        .into_iter()
        .map(|mut route| {
            if route.str_property("label").is_some_and(|l| !l.is_empty()) {
                return route;
            }
            let names: Vec<&str> = ["shortName", "longName"]
                .into_iter()
                .filter_map(|key| route.str_property(key))
                .filter(|s| !s.is_empty())
                .collect();
            if !names.is_empty() {
                let label = names.join(" ");
                route.properties.insert("label".to_string(), Value::from(label));
            }
            route
        })
        .collect()
}

/// Matching history entries, minus excluded layers, capped at
/// `HISTORY_LIMIT`.
///
/// Replayed entries are re-tagged as `OldSearch`, lose their stale timetable
/// flag and their geocoder confidence.
pub fn old_searches(history: Vec<ResultItem>, input: &str, excluded: &[&str]) -> Vec<ResultItem> {
    filter_matching_to_input(history, input, HISTORY_FIELDS)
        .into_iter()
        .filter(|item| !item.layer().is_some_and(|l| excluded.contains(&l)))
        .take(HISTORY_LIMIT)
        .map(|mut item| {
            item.kind = ResultKind::OldSearch;
            item.timetable_clicked = Some(false);
            item.properties.remove("confidence");
            item
        })
        .collect()
}

/// Geocoding source filter for the given feeds: `gtfsHSL,gtfsHSLlautta`.
pub fn gtfs_sources(feed_ids: &[String]) -> String {
    feed_ids
        .iter()
        .map(|id| format!("gtfs{id}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Query the geocoder, skipping blank input and input too short for the
/// configured minimal pattern.
pub async fn geocode<G: Geocoder>(
    geocoder: &G,
    query: &GeocodingQuery,
    config: &SearchConfig,
) -> Result<Vec<ResultItem>, SourceError> {
    if query.text.trim().is_empty() {
        return Ok(Vec::new());
    }
    if let Some(pattern) = &config.search.minimal_regexp
        && !pattern.is_match(&query.text)
    {
        trace!(text = %query.text, "query below minimal pattern");
        return Ok(Vec::new());
    }

    geocoder.resolve(query).await.map_err(|e| {
        debug!(text = %query.text, error = %e, "geocoding failed");
        SourceError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Pattern;
    use crate::geocoding::GeocodingError;
    use std::sync::Mutex;

    fn history_item(label: &str, layer: &str) -> ResultItem {
        ResultItem::new(ResultKind::Feature)
            .with_property("label", label)
            .with_property("layer", layer)
            .with_property("confidence", 0.8)
    }

    fn stop_at(name: &str, lat: f64, lon: f64) -> ResultItem {
        ResultItem::new(ResultKind::Stop)
            .with_property("name", name)
            .with_property("layer", "stop")
            .with_geometry(Geometry::point(lon, lat))
    }

    #[test]
    fn current_position_only_for_empty_input() {
        let position = Position::located(60.17, 24.94, "Mannerheimintie 1");

        let items = current_position_if_empty("", &position);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.kind, ResultKind::CurrentLocation);
        assert_eq!(item.layer(), Some("currentPosition"));
        assert_eq!(item.str_property("labelId"), Some("use-own-position"));
        assert_eq!(item.str_property("address"), Some("Mannerheimintie 1"));
        assert_eq!(item.geometry.unwrap().coordinates, [24.94, 60.17]);

        assert!(current_position_if_empty("k", &position).is_empty());
    }

    #[test]
    fn favourites_sorted_by_name() {
        let favourites = vec![
            FavouriteLocation::new("Work", "Kaivokatu 1", 60.17, 24.94),
            FavouriteLocation::new("Gym", "Urheilukatu 2", 60.18, 24.92),
            FavouriteLocation::new("Home", "Opastinsilta 6", 60.19, 24.93),
        ];

        let items = favourite_locations(favourites, "");
        let labels: Vec<_> = items.iter().filter_map(|i| i.label()).collect();
        assert_eq!(labels, vec!["Gym", "Home", "Work"]);

        let home = &items[1];
        assert_eq!(home.kind, ResultKind::FavouritePlace);
        assert_eq!(home.layer(), Some("favouritePlace"));
        assert_eq!(home.str_property("address"), Some("Opastinsilta 6"));
        assert_eq!(home.geometry.unwrap().coordinates, [24.93, 60.19]);
    }

    #[test]
    fn favourites_filtered_by_input() {
        let favourites = vec![
            FavouriteLocation::new("Home", "Opastinsilta 6", 60.19, 24.93),
            FavouriteLocation::new("Work", "Kaivokatu 1", 60.17, 24.94),
        ];
        let items = favourite_locations(favourites, "ho");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label(), Some("Home"));
    }

    #[test]
    fn favourite_stops_nearest_first() {
        let stops = vec![
            stop_at("Far", 61.5, 23.8),
            ResultItem::new(ResultKind::Stop).with_property("name", "Nowhere"),
            stop_at("Near", 60.171, 24.941),
        ];

        let sorted = favourite_stops(stops.clone(), "", RefPoint::new(60.17, 24.94));
        let names: Vec<_> = sorted.iter().filter_map(|i| i.label()).collect();
        assert_eq!(names, vec!["Near", "Far", "Nowhere"]);

        // No reference point: fetch order kept
        let unsorted = favourite_stops(stops, "", RefPoint::default());
        let names: Vec<_> = unsorted.iter().filter_map(|i| i.label()).collect();
        assert_eq!(names, vec!["Far", "Nowhere", "Near"]);
    }

    #[test]
    fn routes_get_a_label() {
        let route = |short: &str, long: &str| {
            ResultItem::new(ResultKind::Route)
                .with_property("shortName", short)
                .with_property("longName", long)
                .with_property("layer", "route-BUS")
        };
        let labelled = labelled_routes(vec![
            route("550", "Itäkeskus - Westendinasema"),
            route("55", ""),
            route("", "").with_property("label", "Jokeri"),
        ]);

        let labels: Vec<_> = labelled.iter().filter_map(|i| i.label()).collect();
        assert_eq!(labels, vec!["550 Itäkeskus - Westendinasema", "55", "Jokeri"]);
    }

    #[test]
    fn old_searches_are_restamped() {
        let mut entry = history_item("Pasila", "station");
        entry.timetable_clicked = Some(true);

        let items = old_searches(vec![entry], "pas", &[]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ResultKind::OldSearch);
        assert_eq!(items[0].timetable_clicked, Some(false));
        assert!(items[0].confidence().is_none());
    }

    #[test]
    fn old_searches_drop_excluded_layers_and_cap() {
        let mut history: Vec<_> = (0..15)
            .map(|i| history_item(&format!("Stop {i}"), "stop"))
            .collect();
        history.insert(0, history_item("Stop bus", "route-BUS"));

        let items = old_searches(history, "stop", &["route-BUS"]);
        assert_eq!(items.len(), HISTORY_LIMIT);
        assert!(items.iter().all(|i| i.layer() == Some("stop")));
        assert_eq!(items[0].label(), Some("Stop 0"));
    }

    #[test]
    fn gtfs_source_filter() {
        let ids = vec!["HSL".to_string(), "HSLlautta".to_string()];
        assert_eq!(gtfs_sources(&ids), "gtfsHSL,gtfsHSLlautta");
        assert_eq!(gtfs_sources(&[]), "");
    }

    /// Records queries; always returns a single feature.
    #[derive(Default)]
    struct RecordingGeocoder {
        queries: Mutex<Vec<GeocodingQuery>>,
    }

    impl Geocoder for RecordingGeocoder {
        async fn resolve(&self, query: &GeocodingQuery) -> Result<Vec<ResultItem>, GeocodingError> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(vec![
                ResultItem::new(ResultKind::Feature).with_property("label", "Kamppi"),
            ])
        }
    }

    #[tokio::test]
    async fn geocode_skips_blank_and_short_input() {
        let geocoder = RecordingGeocoder::default();
        let config = SearchConfig::default().with_minimal_regexp(Pattern::new("^.{3,}$").unwrap());

        let blank = GeocodingQuery::new("   ", "fi");
        assert!(geocode(&geocoder, &blank, &config).await.unwrap().is_empty());

        let short = GeocodingQuery::new("ka", "fi");
        assert!(geocode(&geocoder, &short, &config).await.unwrap().is_empty());

        let long = GeocodingQuery::new("kamp", "fi");
        assert_eq!(geocode(&geocoder, &long, &config).await.unwrap().len(), 1);

        assert_eq!(geocoder.queries.lock().unwrap().len(), 1);
    }
}
