//! Domain types for the trip search.
//!
//! Result items, positions, favourites and the target/source vocabulary
//! shared by every stage of the search pipeline.

mod error;
mod favourite;
mod item;
mod position;
mod target;

pub use error::DomainError;
pub use favourite::{FavouriteLocation, FavouriteStop, StopKind};
pub use item::{Geometry, GeometryKind, Properties, ResultItem, ResultKind, layer};
pub use position::{Coordinate, EARTH_RADIUS_KM, Position, PositionStatus, RefPoint};
pub use target::{Selection, Source, Target};
