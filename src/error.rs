use crate::ir::EventId;

/// Errors raised while building timeline input or configuration.
///
/// Layout passes never fail; these only surface at the edges (parsing,
/// config loading, lookups by id).
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("invalid date '{0}'")]
    InvalidDate(String),
    #[error("unknown placement '{0}' (expected up or down)")]
    UnknownPlacement(String),
    #[error("no event with id {0}")]
    UnknownEvent(EventId),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid event JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}
