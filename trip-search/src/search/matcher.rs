//! Free-text matching over named fields.

use serde_json::Value;

use crate::domain::{FavouriteLocation, ResultItem};

/// Access to string fields by path.
///
/// Missing fields, and fields that are not strings, yield `None`.
pub trait FieldLookup {
    fn field(&self, path: &str) -> Option<&str>;
}

impl FieldLookup for ResultItem {
    /// Supports `properties.<key>` paths.
    fn field(&self, path: &str) -> Option<&str> {
        path.strip_prefix("properties.")
            .and_then(|key| self.str_property(key))
    }
}

impl FieldLookup for FavouriteLocation {
    fn field(&self, path: &str) -> Option<&str> {
        match path {
            "name" => Some(self.name.as_str()),
            "address" => self.address.as_deref(),
            other => self.extra.get(other).and_then(Value::as_str),
        }
    }
}

/// Keep the items where at least one of `fields` contains `input`,
/// case-insensitively. An empty input keeps everything.
///
/// Relative order is preserved.
pub fn filter_matching_to_input<T: FieldLookup>(items: Vec<T>, input: &str, fields: &[&str]) -> Vec<T> {
    if input.is_empty() {
        return items;
    }

    let needle = input.to_lowercase();
    items
        .into_iter()
        .filter(|item| {
            fields.iter().any(|path| {
                item.field(path)
                    .is_some_and(|value| value.to_lowercase().contains(&needle))
            })
        })
        .collect()
}
