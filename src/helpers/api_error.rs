use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Errors surfaced to HTTP callers. Everything renders as the same
/// `{"error": "..."}` envelope, only the status class differs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Latitude and Longitude must be valid numbers.")]
    InvalidCoordinate,

    #[error("Radius must be a positive number.")]
    InvalidRadius,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Restaurant not found")]
    NotFound,

    #[error("{0}")]
    Backend(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCoordinate
            | ApiError::InvalidRadius
            | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("Request failed due to: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Backend(err.to_string())
    }
}
