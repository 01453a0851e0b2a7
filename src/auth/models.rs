// Account data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::validate_alphanumeric;

/// Lifecycle status of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "PascalCase")]
#[serde(rename_all = "PascalCase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Blocked,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "Active",
            AccountStatus::Inactive => "Inactive",
            AccountStatus::Blocked => "Blocked",
        }
    }
}

impl Default for AccountStatus {
    fn default() -> Self {
        AccountStatus::Active
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role carried in identity tokens and checked by the authorization gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account record as stored by the account directory
///
/// The password hash never leaves the service: it is skipped on
/// serialization and absent from every response DTO.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: i32,
    pub user_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone_number: String,
    pub status: AccountStatus,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn is_blocked(&self) -> bool {
        self.status == AccountStatus::Blocked
    }
}

/// Account fields known before the directory assigns an id and timestamps
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub status: AccountStatus,
    pub role: Role,
}

/// Registration request DTO
///
/// Absent fields read as empty so they fail the required-field check
/// rather than body parsing.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    #[serde(rename = "username", alias = "user_name")]
    #[schema(example = "JohnDoe")]
    #[validate(
        length(min = 3, max = 16, message = "Username must be between 3 and 16 characters"),
        custom = "validate_alphanumeric"
    )]
    pub user_name: String,
    #[schema(example = "johndoe@gmail.com")]
    pub email: String,
    #[serde(alias = "phonenumber")]
    #[schema(example = "1234567890")]
    pub phone_number: String,
    #[schema(example = "Johndoe123!")]
    pub password: String,
}

/// Login request DTO
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(example = "johndoe@gmail.com")]
    pub email: String,
    #[schema(example = "Johndoe123!")]
    pub password: String,
}

/// Outward projection used by the profile endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub status: AccountStatus,
}

impl From<Account> for ProfileView {
    fn from(account: Account) -> Self {
        Self {
            name: account.user_name,
            email: account.email,
            phone_number: account.phone_number,
            status: account.status,
        }
    }
}

/// Account response model (excludes password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: i32,
    pub user_name: String,
    pub email: String,
    pub phone_number: String,
    pub status: AccountStatus,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            user_name: account.user_name,
            email: account.email,
            phone_number: account.phone_number,
            status: account.status,
            role: account.role,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Result of a successful login: the account and its freshly issued token
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub account: Account,
    pub token: String,
}

/// Response body for POST /api/v1/users/signup
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub message: String,
    pub user: AccountResponse,
}

/// Response body for POST /api/v1/users/login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: AccountResponse,
}

/// Response body for GET /api/v1/users/profile
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: ProfileView,
}
