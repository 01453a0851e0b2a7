// Router assembly and shared application state

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{
    handlers::{self, health_handler, login_handler, profile_handler, signup_handler},
    middleware::{require_role, AuthorizationGate, RequireRole},
    models::{
        AccountResponse, AccountStatus, LoginRequest, LoginResponse, ProfileResponse,
        ProfileView, Role, SignupRequest, SignupResponse,
    },
    repository::AccountDirectory,
    service::AccountService,
    token::TokenService,
};
use crate::config::TokenConfig;
use crate::error::ErrorResponse;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::signup_handler,
        handlers::login_handler,
        handlers::profile_handler,
        handlers::health_handler,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            SignupResponse,
            LoginResponse,
            ProfileResponse,
            ProfileView,
            AccountResponse,
            AccountStatus,
            Role,
            ErrorResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "Account signup, login and profile endpoints"),
        (name = "health", description = "Liveness probe")
    ),
    info(
        title = "Account API",
        version = "1.0.0",
        description = "User account service with password login and JWT-gated profile access"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
///
/// The account service and the gate share one token service, so tokens
/// issued at login are exactly the ones the gate accepts.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AccountService>,
    pub gate: Arc<AuthorizationGate>,
}

impl AppState {
    pub fn new(directory: Arc<dyn AccountDirectory>, token_config: &TokenConfig) -> Self {
        let token_service = TokenService::new(token_config);
        Self {
            service: Arc::new(AccountService::new(directory, token_service.clone())),
            gate: Arc::new(AuthorizationGate::new(token_service)),
        }
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS and tracing layers
pub fn create_router(state: AppState) -> Router {
    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/profile", get(profile_handler))
        .route_layer(middleware::from_fn_with_state(
            RequireRole::user(state.gate.clone()),
            require_role,
        ));

    let users = Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .merge(protected);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/v1/users", users)
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state.service)
}
