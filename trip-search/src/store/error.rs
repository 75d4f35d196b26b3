//! Store error types.

/// Error loading a data snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The snapshot file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON for a store
    #[error("invalid store data: {0}")]
    Json(#[from] serde_json::Error),
}
