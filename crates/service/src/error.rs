//! Typed error enum for the service layer.
//!
//! Callers match on failure modes instead of inspecting strings; the HTTP
//! layer maps each variant onto a status code.

use lessonhub_storage::StorageError;
use thiserror::Error;

/// Service-layer error unifying storage, auth and hashing failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Caller provided invalid input (empty name).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Input rejected because of one named field (phone already taken).
    #[error("invalid {field}: {message}")]
    InvalidField { field: &'static str, message: String },

    /// Credentials or bearer token rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Settings produce values the service cannot use.
    #[error("configuration: {0}")]
    Config(String),

    /// Password hashing or verification could not run.
    #[error("password hashing: {0}")]
    Hashing(String),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::NotFound { .. }))
    }

    /// Whether this error represents a duplicate/conflict.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }

    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        Self::Storage(StorageError::NotFound { entity, id: id.to_owned() })
    }
}

impl From<bcrypt::BcryptError> for ServiceError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Hashing(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Hashing(format!("blocking task failed: {err}"))
    }
}
