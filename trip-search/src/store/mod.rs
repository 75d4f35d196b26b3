//! User data stores backing a search.
//!
//! The search core reads favourites, history and the transit catalogue through
//! `SearchContext`. This module provides an in-memory implementation loaded
//! from a JSON snapshot.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemoryContext;
