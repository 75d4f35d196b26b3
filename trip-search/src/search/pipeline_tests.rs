//! End-to-end tests for the search pipeline.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::config::{Pattern, SearchConfig};
use crate::domain::{
    FavouriteLocation, FavouriteStop, Geometry, Position, PositionStatus, RefPoint, ResultItem,
    ResultKind, Selection, Source, StopKind, Target,
};
use crate::geocoding::{Geocoder, GeocodingError, GeocodingQuery, LOCATION_LAYERS, STOP_LAYERS};
use crate::store::MemoryContext;

/// Serves fixed features, or fails every call. Records every query.
#[derive(Default)]
struct StubGeocoder {
    features: Vec<ResultItem>,
    fail: bool,
    queries: Mutex<Vec<GeocodingQuery>>,
}

impl StubGeocoder {
    fn with_features(features: Vec<ResultItem>) -> Self {
        Self {
            features,
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn queries(&self) -> Vec<GeocodingQuery> {
        self.queries.lock().unwrap().clone()
    }
}

impl Geocoder for StubGeocoder {
    async fn resolve(&self, query: &GeocodingQuery) -> Result<Vec<ResultItem>, GeocodingError> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(GeocodingError::Api {
                status: 503,
                message: "unavailable".into(),
            });
        }
        Ok(self.features.clone())
    }
}

fn feature(label: &str, layer: &str, confidence: f64) -> ResultItem {
    ResultItem::new(ResultKind::Feature)
        .with_property("label", label)
        .with_property("layer", layer)
        .with_property("confidence", confidence)
}

fn favourites() -> Vec<FavouriteLocation> {
    vec![
        FavouriteLocation::new("Home", "Opastinsilta 6", 60.19, 24.93),
        FavouriteLocation::new("Work", "Kaivokatu 1", 60.17, 24.94),
    ]
}

fn request(input: &str, targets: &[Target], sources: &[Source]) -> SearchRequest {
    SearchRequest::new(input, Arc::new(SearchConfig::default()))
        .with_targets(Selection::only(targets.iter().copied()))
        .with_sources(Selection::only(sources.iter().copied()))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn labels(batch: &SearchResultBatch) -> Vec<&str> {
    batch.results.iter().filter_map(|i| i.label()).collect()
}

#[tokio::test]
async fn current_position_for_empty_input() {
    let context = MemoryContext::default().with_position(Position::located(60.17, 24.94, "Mannerheimintie 1"));
    let geocoder = StubGeocoder::default();

    let batch = get_search_results(
        &context,
        &geocoder,
        &DefaultRanker,
        &request("", &[Target::CurrentPosition], &[]),
    )
    .await;

    assert_eq!(batch.term, "");
    assert!(batch.error.is_none());
    assert_eq!(batch.results.len(), 1);
    assert_eq!(batch.results[0].kind, ResultKind::CurrentLocation);
    assert!(geocoder.queries().is_empty());
}

#[tokio::test]
async fn current_position_skipped_when_unsupported() {
    let position = Position {
        status: PositionStatus::GeolocationNotSupported,
        ..Position::default()
    };
    let context = MemoryContext::default().with_position(position);

    let batch = get_search_results(
        &context,
        &StubGeocoder::default(),
        &DefaultRanker,
        &request("", &[Target::CurrentPosition], &[]),
    )
    .await;
    assert!(batch.results.is_empty());
}

#[tokio::test]
async fn current_position_not_implied_by_wildcard() {
    let context = MemoryContext::default().with_position(Position::located(60.17, 24.94, "Mannerheimintie 1"));
    let request = SearchRequest::new("", Arc::new(SearchConfig::default()));

    let batch = get_search_results(&context, &StubGeocoder::default(), &DefaultRanker, &request).await;
    assert!(batch.results.iter().all(|i| i.kind != ResultKind::CurrentLocation));
}

#[tokio::test]
async fn favourite_places_matching_input() {
    let context = MemoryContext::default().with_favourite_locations(favourites());

    let batch = get_search_results(
        &context,
        &StubGeocoder::default(),
        &DefaultRanker,
        &request("ho", &[Target::Locations], &[Source::Favourite]),
    )
    .await;

    assert_eq!(labels(&batch), vec!["Home"]);
    assert_eq!(batch.results[0].kind, ResultKind::FavouritePlace);
}

#[tokio::test]
async fn history_replaces_geocoded_duplicate() {
    let history = feature("Kamppi, Helsinki", "venue", 0.5);
    let context = MemoryContext::default().with_endpoint_history(vec![history]);
    let geocoder = StubGeocoder::with_features(vec![
        feature("Kamppi, Helsinki", "venue", 0.9),
        feature("Kampinkatu, Helsinki", "street", 0.7),
    ]);

    let batch = get_search_results(
        &context,
        &geocoder,
        &DefaultRanker,
        &request("kamp", &[Target::Locations], &[Source::Datasource, Source::History]),
    )
    .await;

    assert_eq!(labels(&batch), vec!["Kamppi, Helsinki", "Kampinkatu, Helsinki"]);
    let kamppi = &batch.results[0];
    assert_eq!(kamppi.kind, ResultKind::OldSearch);
    assert!(kamppi.confidence().is_none());
}

#[tokio::test]
async fn failing_source_empties_results() {
    let context = MemoryContext::default().with_favourite_locations(favourites());
    let geocoder = StubGeocoder::failing();

    let batch = get_search_results(
        &context,
        &geocoder,
        &DefaultRanker,
        &request("home", &[Target::Locations], &[]),
    )
    .await;

    assert!(batch.is_error());
    assert!(batch.results.is_empty());
    assert_eq!(batch.term, "home");

    let json = serde_json::to_value(&batch).unwrap();
    assert_eq!(json["type"], "all");
    assert!(json["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn unknown_targets_find_nothing() {
    let context = MemoryContext::default().with_favourite_locations(favourites());
    let geocoder = StubGeocoder::with_features(vec![feature("Home Street", "street", 0.9)]);
    let request = SearchRequest::from_names(
        "home",
        ["Galaxies"],
        Vec::<String>::new(),
        Arc::new(SearchConfig::default()),
    );

    let batch = get_search_results(&context, &geocoder, &DefaultRanker, &request).await;
    assert!(batch.results.is_empty());
    assert!(batch.error.is_none());
    assert!(geocoder.queries().is_empty());

    let json = serde_json::to_value(&batch).unwrap();
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn favourite_stops_resolved_from_catalogue() {
    let stop = |id: &str, name: &str, lat: f64, lon: f64| {
        ResultItem::new(ResultKind::Stop)
            .with_property("gtfsId", id)
            .with_property("name", name)
            .with_geometry(Geometry::point(lon, lat))
    };
    let favourite = |id: &str, kind: StopKind| FavouriteStop {
        gtfs_id: id.to_string(),
        kind,
        name: None,
    };
    let context = MemoryContext::default()
        .with_stops(vec![
            stop("HSL:1", "Pasila", 60.199, 24.933),
            stop("HSL:2", "Kauppatori", 60.167, 24.953),
        ])
        .with_favourite_stops(vec![
            favourite("HSL:1", StopKind::Station),
            favourite("HSL:2", StopKind::Stop),
        ]);

    let request = request("", &[Target::Stops], &[Source::Favourite]).with_ref_point(RefPoint::new(60.168, 24.952));
    let batch = get_search_results(&context, &StubGeocoder::default(), &DefaultRanker, &request).await;

    // Empty term: favourite stations rank above favourite stops
    assert_eq!(labels(&batch), vec!["Pasila", "Kauppatori"]);
    assert_eq!(batch.results[0].kind, ResultKind::Station);
    assert_eq!(batch.results[1].layer(), Some("favouriteStop"));
}

#[tokio::test]
async fn geocoding_queries_per_target() {
    let config = SearchConfig::default()
        .with_feed_ids(["HSL", "HSLlautta"])
        .with_search_sources(["oa", "osm"])
        .with_location_aware(true);
    let context = MemoryContext::default()
        .with_language("sv")
        .with_position(Position::located(60.1699, 24.9384, "Kaivokatu 1"));
    let geocoder = StubGeocoder::default();

    let request = SearchRequest::new("kamp", Arc::new(config))
        .with_targets(Selection::only([Target::Locations, Target::Stops]))
        .with_sources(Selection::only([Source::Datasource]));
    get_search_results(&context, &geocoder, &DefaultRanker, &request).await;

    let queries = geocoder.queries();
    assert_eq!(queries.len(), 2);

    let location = queries.iter().find(|q| q.sources == "oa,osm").unwrap();
    assert_eq!(location.language, "sv");
    assert_eq!(location.layers, strings(LOCATION_LAYERS));
    let focus = location.focus.as_ref().unwrap();
    assert_eq!((focus.lat.as_str(), focus.lon.as_str()), ("60.17", "24.94"));

    let stops = queries.iter().find(|q| q.sources == "gtfsHSL,gtfsHSLlautta").unwrap();
    assert_eq!(stops.layers, strings(STOP_LAYERS));
}

#[tokio::test]
async fn short_input_skips_geocoding() {
    let config = SearchConfig::default().with_minimal_regexp(Pattern::new(".{3,}").unwrap());
    let geocoder = StubGeocoder::with_features(vec![feature("Kamppi", "venue", 0.9)]);
    let request = SearchRequest::new("ka", Arc::new(config))
        .with_targets(Selection::only([Target::Locations]))
        .with_sources(Selection::only([Source::Datasource]));

    let batch = get_search_results(&MemoryContext::default(), &geocoder, &DefaultRanker, &request).await;
    assert!(batch.results.is_empty());
    assert!(geocoder.queries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dispatcher_reports_failure_once() {
    let dispatcher = SearchDispatcher::new(Arc::new(StubGeocoder::failing()));
    let context = Arc::new(MemoryContext::default().with_favourite_locations(favourites()));

    let delivered: Arc<Mutex<Vec<Option<SearchResultBatch>>>> = Arc::default();
    let sink = delivered.clone();
    let callback: SearchCallback = Arc::new(move |batch: Option<SearchResultBatch>| sink.lock().unwrap().push(batch));

    dispatcher.execute_search(context, request("home", &[Target::Locations], &[]), callback);
    tokio::time::sleep(Duration::from_secs(1)).await;

    let delivered = delivered.lock().unwrap();
    assert_eq!(delivered.len(), 2);
    assert!(delivered[0].is_none());
    let batch = delivered[1].as_ref().unwrap();
    assert!(batch.is_error());
    assert!(batch.results.is_empty());
    assert_eq!(batch.generation, 1);
}

#[tokio::test]
async fn routes_survive_merge_with_route_history() {
    let route = |id: &str, short: &str, long: &str| {
        ResultItem::new(ResultKind::Route)
            .with_property("gtfsId", id)
            .with_property("shortName", short)
            .with_property("longName", long)
            .with_property("layer", "route-BUS")
    };
    let visited = |kind: ResultKind, name: &str, layer: &str| {
        ResultItem::new(kind)
            .with_property("name", name)
            .with_property("layer", layer)
    };
    let context = MemoryContext::default()
        .with_routes(vec![
            route("HSL:1550", "550", "Itäkeskus - Westendinasema"),
            route("HSL:1055", "55", "Koskela - Rautatientori"),
        ])
        .with_favourite_routes(vec!["HSL:1550".into()])
        .with_history(vec![
            route("HSL:1058", "58", "Itäkeskus - Pasila"),
            visited(ResultKind::Stop, "Itäkeskus (M)", "stop"),
            visited(ResultKind::Station, "Itäkeskus", "station"),
        ]);
    let geocoder = StubGeocoder::with_features(vec![feature("Itäkeskus, Helsinki", "venue", 0.9)]);

    let batch = get_search_results(
        &context,
        &geocoder,
        &DefaultRanker,
        &request("itä", &[Target::Routes], &[Source::Favourites, Source::History]),
    )
    .await;

    assert!(batch.error.is_none());
    assert_eq!(labels(&batch), vec!["550 Itäkeskus - Westendinasema", "58"]);
    assert_eq!(batch.results[0].kind, ResultKind::Route);
    assert_eq!(batch.results[0].str_property("gtfsId"), Some("HSL:1550"));
    assert_eq!(batch.results[1].kind, ResultKind::OldSearch);
    assert_eq!(batch.results[1].layer(), Some("route-BUS"));
    assert!(geocoder.queries().is_empty());
}

#[tokio::test]
async fn routes_found_without_favourites() {
    let context = MemoryContext::default().with_routes(vec![
        ResultItem::new(ResultKind::Route)
            .with_property("gtfsId", "HSL:1550")
            .with_property("shortName", "550")
            .with_property("longName", "Itäkeskus - Westendinasema")
            .with_property("layer", "route-BUS"),
    ]);

    let batch = get_search_results(
        &context,
        &StubGeocoder::default(),
        &DefaultRanker,
        &request("550", &[Target::Routes], &[Source::Datasource]),
    )
    .await;

    assert_eq!(labels(&batch), vec!["550 Itäkeskus - Westendinasema"]);
}
