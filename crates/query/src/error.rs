use arbor_path::PathError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Query parse error in '{0}': {1}")]
    Parse(String, String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Variable '{0}' not found")]
    UnknownVariable(String),

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error(transparent)]
    Path(#[from] PathError),
}
