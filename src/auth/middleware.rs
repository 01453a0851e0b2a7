// Authorization gate and role middleware for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::{error::AuthError, models::Role, token::Claims, token::TokenService};

const BEARER_PREFIX: &str = "Bearer ";

/// Verified identity attached to an authorized request
///
/// Built once by the gate and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationContext {
    claims: Claims,
}

impl AuthorizationContext {
    pub fn account_id(&self) -> i32 {
        self.claims.sub
    }

    pub fn email(&self) -> &str {
        &self.claims.email
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

/// Gate that turns a raw `Authorization` header into an authorization context
///
/// States run in order: no header, bearer extraction, token verification,
/// role check. The first failing state decides the error.
#[derive(Clone)]
pub struct AuthorizationGate {
    token_service: TokenService,
}

impl AuthorizationGate {
    pub fn new(token_service: TokenService) -> Self {
        Self { token_service }
    }

    pub fn authorize(
        &self,
        raw_header: Option<&str>,
        required: Option<Role>,
    ) -> Result<AuthorizationContext, AuthError> {
        let header_value = raw_header.ok_or(AuthError::MissingToken)?;

        let token = header_value
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AuthError::MissingToken)?
            .trim();
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        let claims = self.token_service.verify(token)?;

        if let Some(required) = required {
            if claims.role != required {
                return Err(AuthError::InsufficientPermissions {
                    required,
                    actual: claims.role,
                });
            }
        }

        Ok(AuthorizationContext { claims })
    }
}

/// Route-group guard requiring a specific role
#[derive(Clone)]
pub struct RequireRole {
    gate: Arc<AuthorizationGate>,
    required_role: Option<Role>,
}

impl RequireRole {
    pub fn new(gate: Arc<AuthorizationGate>, required_role: Role) -> Self {
        Self {
            gate,
            required_role: Some(required_role),
        }
    }

    /// Any valid token passes, whatever its role
    pub fn any(gate: Arc<AuthorizationGate>) -> Self {
        Self {
            gate,
            required_role: None,
        }
    }

    pub fn admin(gate: Arc<AuthorizationGate>) -> Self {
        Self::new(gate, Role::Admin)
    }

    pub fn user(gate: Arc<AuthorizationGate>) -> Self {
        Self::new(gate, Role::User)
    }
}

/// Middleware running the gate and storing the context in request extensions
///
/// Mount with `axum::middleware::from_fn_with_state(RequireRole::user(gate), require_role)`.
pub async fn require_role(
    State(guard): State<RequireRole>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();

    // A header that is not visible ASCII cannot carry a bearer token
    let raw_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    let context = guard
        .gate
        .authorize(raw_header, guard.required_role)
        .map_err(|e| {
            warn!(endpoint = %endpoint, reason = %e, "authorization failed");
            e
        })?;

    debug!(
        account_id = context.account_id(),
        role = %context.role(),
        endpoint = %endpoint,
        "authorization successful"
    );
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthorizationContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    /// Only present behind `require_role`; anywhere else the request is unauthenticated
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthorizationContext>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}
