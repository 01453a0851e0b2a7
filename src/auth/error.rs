// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::models::Role;
use crate::error::ErrorResponse;

/// External message shared by every token verification failure
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

/// Why a presented token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Structurally unparseable: wrong segment count, bad base64 or JSON
    #[error("malformed token")]
    Malformed,
    /// Parseable, but the algorithm, signature or issuer does not check out
    #[error("token signature verification failed")]
    BadSignature,
    /// Parseable and correctly signed, but past its expiry
    #[error("token has expired")]
    Expired,
}

/// Authentication and authorization error types
#[derive(Debug, Error)]
pub enum AuthError {
    /// Field-level input error the caller can correct
    #[error("Validation error on {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Signup conflict; deliberately silent about which field collided
    #[error("User already exists")]
    DuplicateAccount,

    /// Unknown email or wrong password, indistinguishable by design
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Credentials are correct but the account is administratively blocked
    #[error("User is blocked")]
    AccountBlocked,

    #[error("User not found")]
    NotFound,

    /// No credential header, or one without the bearer scheme
    #[error("Missing authentication token")]
    MissingToken,

    /// Bearer scheme present but nothing after it
    #[error("Empty bearer token")]
    EmptyToken,

    #[error("Token rejected: {0}")]
    Token(#[from] TokenError),

    /// Identity is valid but the role does not match the requirement
    #[error("Insufficient permissions: required role '{required}', but user has role '{actual}'")]
    InsufficientPermissions { required: Role, actual: Role },

    /// Account directory failure
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Password hashing error")]
    PasswordHash,

    #[error("Token generation error: {0}")]
    TokenGeneration(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AuthError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation { .. } => StatusCode::BAD_REQUEST,
            AuthError::DuplicateAccount => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AccountBlocked => StatusCode::FORBIDDEN,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::EmptyToken => StatusCode::UNAUTHORIZED,
            AuthError::Token(_) => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGeneration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Validation { .. } => "VALIDATION_ERROR",
            AuthError::DuplicateAccount => "DUPLICATE_ACCOUNT",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AccountBlocked => "ACCOUNT_BLOCKED",
            AuthError::NotFound => "NOT_FOUND",
            AuthError::MissingToken | AuthError::EmptyToken | AuthError::Token(_) => {
                "UNAUTHORIZED"
            }
            AuthError::InsufficientPermissions { .. } => "FORBIDDEN",
            AuthError::Storage(_)
            | AuthError::PasswordHash
            | AuthError::TokenGeneration(_) => "INTERNAL_ERROR",
        }
    }

    /// Get a descriptive error message for this error
    /// This message is safe to send to clients (no sensitive data)
    pub fn error_message(&self) -> String {
        match self {
            AuthError::Validation { reason, .. } => reason.clone(),
            AuthError::DuplicateAccount => "User already exists".to_string(),
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::AccountBlocked => "User is blocked".to_string(),
            AuthError::NotFound => "User not found".to_string(),
            AuthError::MissingToken => "Authorization header required".to_string(),
            AuthError::EmptyToken => "Token missing".to_string(),
            AuthError::Token(_) => INVALID_TOKEN_MESSAGE.to_string(),
            AuthError::InsufficientPermissions { .. } => "Insufficient privileges".to_string(),
            AuthError::Storage(_)
            | AuthError::PasswordHash
            | AuthError::TokenGeneration(_) => "An internal server error occurred".to_string(),
        }
    }

    /// True for faults the caller cannot act on
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }

    fn log(&self) {
        match self {
            AuthError::Validation { field, reason } => {
                debug!("Validation error on {}: {}", field, reason)
            }
            AuthError::DuplicateAccount => warn!("Signup rejected: account already exists"),
            AuthError::InvalidCredentials => warn!("Login rejected: invalid credentials"),
            AuthError::AccountBlocked => warn!("Login rejected: account is blocked"),
            AuthError::NotFound => debug!("Account not found"),
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::EmptyToken => warn!("Empty bearer token in request"),
            AuthError::Token(kind) => warn!("Token rejected: {}", kind),
            AuthError::InsufficientPermissions { required, actual } => warn!(
                "Authorization failed: required role '{}', user has role '{}'",
                required, actual
            ),
            AuthError::Storage(msg) => error!("Storage error in auth: {}", msg),
            AuthError::PasswordHash => error!("Password hashing error"),
            AuthError::TokenGeneration(msg) => error!("Token generation error: {}", msg),
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (field, reason) = crate::validation::first_field_error(&errors);
        AuthError::Validation { field, reason }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();

        let details = match &self {
            AuthError::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            _ => None,
        };

        let body = ErrorResponse {
            error_code: self.error_code().to_string(),
            message: self.error_message(),
            details,
            timestamp: Utc::now().to_rfc3339(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
