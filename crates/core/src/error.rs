use thiserror::Error;

/// Errors raised while parsing or constructing domain values.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CoreError {
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
