//! Transit trip search.
//!
//! Autosuggest search for a trip planner: as the user types an origin or
//! destination, results are gathered from favourites, search history, a
//! geocoding backend and the route catalogue, then merged and ranked.

pub mod analytics;
pub mod citybikes;
pub mod config;
pub mod domain;
pub mod geocoding;
pub mod search;
pub mod store;
pub mod web;
