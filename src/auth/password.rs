// Password hashing and verification service

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

use crate::auth::error::AuthError;

lazy_static! {
    /// Stand-in hash verified when no account matches, so an unknown email
    /// costs the same Argon2 work as a wrong password
    static ref DUMMY_HASH: String = PasswordService::hash_password("unmatched-account-placeholder")
        .expect("argon2 with default parameters hashes any input");
}

/// Password service for hashing and verification
///
/// Uses Argon2id with the crate's default cost parameters and a fresh
/// random salt per hash. The result is a self-describing PHC string.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                AuthError::PasswordHash
            })
    }

    /// Verify a password against a stored hash
    ///
    /// A mismatch is `Ok(false)`; a hash that cannot be parsed is an error.
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            AuthError::PasswordHash
        })?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Hash with the default cost parameters that matches no real password
    pub fn dummy_hash() -> &'static str {
        DUMMY_HASH.as_str()
    }
}
