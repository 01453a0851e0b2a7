// Account service - business logic layer

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::auth::{
    error::AuthError,
    models::{
        Account, AccountStatus, LoginOutcome, LoginRequest, NewAccount, ProfileView, Role,
        SignupRequest,
    },
    password::PasswordService,
    repository::AccountDirectory,
    token::TokenService,
};
use crate::validation::{validate_login, validate_signup};

/// Account service coordinating signup, login and profile lookup
#[derive(Clone)]
pub struct AccountService {
    directory: Arc<dyn AccountDirectory>,
    token_service: TokenService,
    /// Verified in place of a stored hash when the email is unknown
    unmatched_hash: &'static str,
}

impl AccountService {
    pub fn new(directory: Arc<dyn AccountDirectory>, token_service: TokenService) -> Self {
        Self {
            directory,
            token_service,
            unmatched_hash: PasswordService::dummy_hash(),
        }
    }

    pub fn token_service(&self) -> &TokenService {
        &self.token_service
    }

    /// Register a new account
    ///
    /// This method:
    /// 1. Validates the request
    /// 2. Rejects an email that is already registered
    /// 3. Hashes the password
    /// 4. Persists an Active account with the User role
    pub async fn sign_up(&self, request: SignupRequest) -> Result<Account, AuthError> {
        // 1. Validate request
        validate_signup(&request)?;

        let email = normalize_email(&request.email);

        // 2. Check for an existing account
        if self.directory.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateAccount);
        }

        // 3. Hash off the async executor; Argon2 is deliberately slow
        let password = request.password;
        let password_hash =
            tokio::task::spawn_blocking(move || PasswordService::hash_password(&password))
                .await
                .map_err(|e| {
                    error!(error = %e, "password hashing task failed");
                    AuthError::PasswordHash
                })??;

        // 4. Persist
        let account = self
            .directory
            .create(NewAccount {
                user_name: request.user_name.trim().to_string(),
                email,
                password_hash,
                phone_number: request.phone_number.trim().to_string(),
                status: AccountStatus::Active,
                role: Role::User,
            })
            .await?;

        info!(account_id = account.id, "account registered");
        Ok(account)
    }

    /// Check credentials and return the account they belong to
    ///
    /// An unknown email and a wrong password produce the same error. The
    /// blocked check runs only after the password matched, so only the
    /// account owner can learn that the account is blocked.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let account = self.directory.find_by_email(&normalize_email(email)).await?;

        // Unknown emails still pay for a full verify so timing stays flat
        let hash = match &account {
            Some(account) => account.password_hash.clone(),
            None => self.unmatched_hash.to_string(),
        };
        let password = password.to_string();
        let matches =
            tokio::task::spawn_blocking(move || PasswordService::verify_password(&password, &hash))
                .await
                .map_err(|e| {
                    error!(error = %e, "password verification task failed");
                    AuthError::PasswordHash
                })??;

        let account = match account {
            Some(account) => account,
            None => {
                debug!("login for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !matches {
            warn!(account_id = account.id, "login with invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        if account.is_blocked() {
            warn!(account_id = account.id, "login for blocked account");
            return Err(AuthError::AccountBlocked);
        }

        Ok(account)
    }

    /// Log in and issue an identity token for the account
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AuthError> {
        validate_login(&request)?;

        let account = self.authenticate(&request.email, &request.password).await?;
        let token = self
            .token_service
            .issue(account.id, &account.email, account.role)?;

        info!(account_id = account.id, "account logged in");
        Ok(LoginOutcome { account, token })
    }

    /// Get the public profile of an account
    pub async fn get_profile(&self, id: i32) -> Result<ProfileView, AuthError> {
        self.directory
            .find_by_id(id)
            .await?
            .map(ProfileView::from)
            .ok_or(AuthError::NotFound)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
