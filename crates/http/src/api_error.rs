//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into proper HTTP responses with JSON body and status codes.
//! Handlers return `Result<Json<T>, ApiError>` instead of bare `StatusCode`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lessonhub_service::ServiceError;
use lessonhub_storage::StorageError;

/// API error with HTTP status code and human-readable message.
///
/// Converts to JSON response: `{"error": "message"}`, plus `"field"` for
/// validation failures.
///
/// `Internal` variant logs the real error server-side and returns
/// a static message to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request, invalid input from caller.
    BadRequest(String),
    /// 400 Bad Request tied to one request field.
    Validation { field: &'static str, message: String },
    /// 401 Unauthorized, missing or rejected credentials.
    Unauthorized(String),
    /// 403 Forbidden, authenticated but not allowed.
    Forbidden(String),
    /// 404 Not Found, requested resource doesn't exist.
    NotFound(String),
    /// 422 Unprocessable Entity, valid syntax but semantic rejection (e.g., duplicate).
    UnprocessableEntity(String),
    /// 500 Internal Server Error. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, serde_json::json!({"error": msg})),
            Self::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": message, "field": field}),
            ),
            Self::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, serde_json::json!({"error": msg}))
            },
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, serde_json::json!({"error": msg})),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({"error": msg})),
            Self::UnprocessableEntity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, serde_json::json!({"error": msg}))
            },
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({"error": "internal server error"}),
                )
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(ref e) if e.is_duplicate() => {
                Self::UnprocessableEntity("resource already exists".to_owned())
            },
            ServiceError::Storage(StorageError::NotFound { entity, id }) => {
                Self::NotFound(format!("{entity} '{id}' not found"))
            },
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            ServiceError::InvalidField { field, message } => Self::Validation { field, message },
            ServiceError::Unauthorized(msg) => Self::Unauthorized(msg),
            _ => Self::Internal(err.into()),
        }
    }
}
