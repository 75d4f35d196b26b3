//! Domain error types.

/// Errors from parsing caller-supplied domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Target name not recognised
    #[error("unknown search target: {0}")]
    UnknownTarget(String),

    /// Source name not recognised
    #[error("unknown search source: {0}")]
    UnknownSource(String),
}
