//! Merging results from several sources.

use std::collections::HashMap;

use tracing::trace;

use crate::domain::ResultItem;

/// Deduplicate items by display label.
///
/// An item keeps the position where its label first appeared, but a later
/// item with the same label replaces it. Items without a label are dropped.
pub fn uniq_by_label(items: Vec<ResultItem>) -> Vec<ResultItem> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(items.len());
    let mut unique: Vec<ResultItem> = Vec::with_capacity(items.len());

    for item in items {
        let Some(label) = item.label().map(str::to_string) else {
            trace!(kind = ?item.kind, "dropping result without a label");
            continue;
        };

        match positions.get(&label) {
            Some(&idx) => unique[idx] = item,
            None => {
                positions.insert(label, unique.len());
                unique.push(item);
            }
        }
    }

    unique
}
