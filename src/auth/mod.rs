// Authentication module
// Provides account signup, password login with JWT issuance, and role-gated access

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::{AuthError, TokenError};
pub use handlers::{health_handler, login_handler, profile_handler, signup_handler};
pub use middleware::{require_role, AuthorizationContext, AuthorizationGate, RequireRole};
pub use models::{Account, AccountStatus, LoginRequest, ProfileView, Role, SignupRequest};
pub use repository::{AccountDirectory, InMemoryAccountDirectory, PgAccountDirectory};
pub use service::AccountService;
pub use token::{Claims, TokenService};
