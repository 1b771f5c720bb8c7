use thiserror::Error;

/// Convenience result type for the fallible boundaries of the crate.
pub type RosterResult<T> = Result<T, RosterError>;

/// Error type returned by roster ingestion and configuration loading.
///
/// The in-memory pipeline itself (filter/sort/summarize/score) never fails: it falls back to
/// defaults instead. Errors only come from the edges where data enters the crate.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record does not conform to the model schema and was rejected.
    #[error("invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Two records share the same username.
    #[error("duplicate identity '{username}'")]
    DuplicateIdentity { username: String },

    /// A rating scale is not strictly decreasing along tier rank or exceeds 100.
    #[error("invalid rating scale: {message}")]
    InvalidScale { message: String },

    /// Configuration could not be applied.
    #[error("config error: {message}")]
    Config { message: String },
}
