use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Path parse error in '{0}': {1}")]
    Parse(String, String),

    #[error("Step '{0}' does not address a single location")]
    NotAddressable(String),
}
