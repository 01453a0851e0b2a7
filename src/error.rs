// Error handling module for the Account API
// Provides the shared error response body and the handler-level error type

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::auth::error::AuthError;

/// Consistent error response structure
///
/// Every error leaving the service has this shape: a machine-readable
/// `error_code`, a client-safe `message`, optional `details` and a
/// RFC 3339 timestamp.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub timestamp: String,
}

/// Main error type for the API
/// All handlers return Result<T, ApiError>
#[derive(Debug)]
pub enum ApiError {
    /// Request body could not be read as the expected JSON document
    /// Maps to HTTP 400 Bad Request
    InvalidBody(String),

    /// Any failure raised by the identity core
    Auth(AuthError),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(err) => err.status_code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidBody(detail) => {
                debug!("Rejected request body: {}", detail);
                let body = ErrorResponse {
                    error_code: "INVALID_INPUT".to_string(),
                    message: "Invalid input".to_string(),
                    details: None,
                    timestamp: Utc::now().to_rfc3339(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::Auth(err) => err.into_response(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}
