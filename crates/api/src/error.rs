//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found, including path IDs that do not parse.
    NotFound(String),
    /// Malformed request body.
    BadRequest(String),
    /// Error raised by a service.
    Domain(DomainError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(err) => domain_status(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => msg,
            ApiError::Domain(err) => {
                if status.is_server_error() {
                    tracing::error!(error = %err, "internal server error");
                } else {
                    tracing::debug!(error = %err, %status, "request rejected");
                }
                err.to_string()
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

/// A reference that could not be confirmed is a client error, whatever the cause.
fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_)
        | DomainError::DependencyNotFound { .. }
        | DomainError::DependencyUnreachable { .. } => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
