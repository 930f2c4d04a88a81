use thiserror::Error;

/// Failures from the on-disk stores (config, best record, run history).
///
/// The engine never surfaces these to its caller; they are logged and the
/// session carries on with defaults.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
