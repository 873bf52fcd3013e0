//! Typed error enum for the LLM crate.

use thiserror::Error;

/// Errors from LLM API operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("empty response: no content returned")]
    EmptyResponse,
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("all retries exhausted, last error: {0}")]
    RetriesExhausted(Box<LlmError>),
}

impl LlmError {
    /// Whether this error is transient and should be retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(_) => true,
            Self::HttpStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503 | 529),
            _ => false,
        }
    }

    /// Whether this error points at deployment configuration (bad key,
    /// wrong base URL or model) rather than a passing upstream fault.
    #[must_use]
    pub fn is_misconfiguration(&self) -> bool {
        match self {
            Self::ClientInit(_) => true,
            Self::HttpStatus { code, .. } => matches!(code, 401 | 403 | 404),
            Self::RetriesExhausted(inner) => inner.is_misconfiguration(),
            _ => false,
        }
    }
}
