use arbor_path::PathError;
use arbor_query::QueryError;
use thiserror::Error;

/// Errors surfaced by the [`Engine`](crate::Engine) facade.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Query failed: {0}")]
    Query(#[from] QueryError),

    #[error("Invalid JSON data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PathError> for Error {
    fn from(e: PathError) -> Self {
        Error::Query(QueryError::Path(e))
    }
}
