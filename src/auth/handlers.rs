// HTTP handlers for account endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::auth::{
    middleware::AuthorizationContext,
    models::{
        AccountResponse, LoginRequest, LoginResponse, ProfileResponse, SignupRequest,
        SignupResponse,
    },
    service::AccountService,
};
use crate::error::ApiError;

/// Register a new account
/// POST /api/v1/users/signup
#[utoipa::path(
    post,
    path = "/api/v1/users/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn signup_handler(
    State(service): State<Arc<AccountService>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let Json(request) = payload?;
    tracing::debug!("Signup request received");

    let account = service.sign_up(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User signed up successfully!".to_string(),
            user: AccountResponse::from(account),
        }),
    ))
}

/// Log in with email and password
/// POST /api/v1/users/login
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid email or password", body = crate::error::ErrorResponse),
        (status = 403, description = "Account is blocked", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn login_handler(
    State(service): State<Arc<AccountService>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;

    let outcome = service.login(request).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: outcome.token,
        user: AccountResponse::from(outcome.account),
    }))
}

/// Profile of the authenticated account
/// GET /api/v1/users/profile
#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    responses(
        (status = 200, description = "Profile of the caller", body = ProfileResponse),
        (status = 401, description = "Missing, invalid or expired token", body = crate::error::ErrorResponse),
        (status = 403, description = "Insufficient privileges", body = crate::error::ErrorResponse),
        (status = 404, description = "Account no longer exists", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn profile_handler(
    State(service): State<Arc<AccountService>>,
    context: AuthorizationContext,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = service.get_profile(context.account_id()).await?;
    Ok(Json(ProfileResponse { user }))
}

/// Liveness probe
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String)),
    tag = "health"
)]
pub async fn health_handler() -> &'static str {
    "ok"
}
