// JWT token issuance and verification service

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::error::{AuthError, TokenError};
use crate::auth::models::Role;
use crate::config::TokenConfig;

/// The only signing algorithm issued or accepted
const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // account id
    pub email: String,
    pub role: Role,
    pub iat: i64,        // issued at timestamp
    pub exp: i64,        // expiration timestamp
    pub iss: String,
}

/// Token service for JWT operations
///
/// The signing key is injected at construction and never changes for the
/// lifetime of the service. Cloning is cheap enough to share per router.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl_hours: i64,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl_hours: config.ttl_hours,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issue a signed identity token valid for the configured horizon
    pub fn issue(&self, account_id: i32, email: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let exp = self
            .ttl_hours
            .checked_mul(3600)
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| AuthError::TokenGeneration("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: account_id,
            email: email.to_string(),
            role,
            iat: now,
            exp,
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;
        debug!(account_id, role = %role, "jwt issued");
        Ok(token)
    }

    /// Verify a token and return its claims
    ///
    /// Signature and algorithm are checked before any claim, so an expired
    /// token is only reported as such when it was genuinely issued by us.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        // `sub` is numeric, so serde enforces its presence instead
        validation.set_required_spec_claims(&["exp", "iss"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            let kind = classify(e.kind());
            debug!(reason = %kind, "jwt verification failed");
            kind
        })?;

        debug!(account_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidIssuer
        | ErrorKind::ImmatureSignature => TokenError::BadSignature,
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    fn test_config(secret: &str) -> TokenConfig {
        TokenConfig {
            secret: secret.to_string(),
            issuer: "account-api".to_string(),
            ttl_hours: 24,
        }
    }

    // Helper to create a test token service
    fn test_token_service() -> TokenService {
        TokenService::new(&test_config(SECRET))
    }

    fn encode_claims(claims: &Claims, header: Header, secret: &str) -> String {
        encode(&header, claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn claims_at(iat: i64, exp: i64) -> Claims {
        Claims {
            sub: 1,
            email: "test@example.com".to_string(),
            role: Role::User,
            iat,
            exp,
            iss: "account-api".to_string(),
        }
    }

    #[test]
    fn test_token_expiration_is_24_hours() {
        let service = test_token_service();
        let token = service.issue(1, "test@example.com", Role::User).unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.iss, "account-api");
    }

    #[test]
    fn test_token_claims_contain_identity() {
        let service = test_token_service();
        let token = service.issue(42, "user@example.com", Role::Admin).unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_issued_token_verifies_with_numeric_subject() {
        let service = test_token_service();
        let token = service.issue(1, "a@b.co", Role::User).unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, 1);
    }

    #[test]
    fn test_token_without_subject_is_malformed() {
        #[derive(Serialize)]
        struct NoSubject {
            email: String,
            role: Role,
            iat: i64,
            exp: i64,
            iss: String,
        }

        let service = test_token_service();
        let now = Utc::now().timestamp();
        let claims = NoSubject {
            email: "test@example.com".to_string(),
            role: Role::User,
            iat: now,
            exp: now + 600,
            iss: "account-api".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_oversized_ttl_fails_to_issue() {
        let mut config = test_config(SECRET);
        config.ttl_hours = i64::MAX / 1000;
        let service = TokenService::new(&config);

        let result = service.issue(1, "test@example.com", Role::User);
        assert!(matches!(result, Err(AuthError::TokenGeneration(_))));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();
        for token in ["", "not.a.token", "invalid_token_format", "a.b.c.d"] {
            assert_eq!(service.verify(token), Err(TokenError::Malformed), "{}", token);
        }
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let service = test_token_service();
        let token = service.issue(1, "test@example.com", Role::User).unwrap();

        let (message, signature) = token.rsplit_once('.').unwrap();
        let first = signature.chars().next().unwrap();
        let replacement = if first == 'A' { 'B' } else { 'A' };
        let tampered = format!("{}.{}{}", message, replacement, &signature[1..]);

        assert_eq!(service.verify(&tampered), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_token_signed_with_other_key_is_rejected() {
        let issuer = TokenService::new(&test_config("secret1"));
        let verifier = TokenService::new(&test_config("secret2"));
        let token = issuer.issue(1, "test@example.com", Role::User).unwrap();

        assert!(issuer.verify(&token).is_ok());
        assert_eq!(verifier.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_unexpected_algorithm_is_rejected() {
        let service = test_token_service();
        let now = Utc::now().timestamp();
        let token = encode_claims(&claims_at(now, now + 600), Header::new(Algorithm::HS512), SECRET);

        assert_eq!(service.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = test_token_service();
        let now = Utc::now().timestamp();
        let token = encode_claims(&claims_at(now - 1000, now - 500), Header::default(), SECRET);

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_expired_token_with_bad_signature_reports_signature() {
        let service = test_token_service();
        let now = Utc::now().timestamp();
        let token = encode_claims(&claims_at(now - 1000, now - 500), Header::default(), "other");

        assert_eq!(service.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let service = test_token_service();
        let now = Utc::now().timestamp();
        let mut claims = claims_at(now, now + 600);
        claims.iss = "someone-else".to_string();
        let token = encode_claims(&claims, Header::default(), SECRET);

        assert_eq!(service.verify(&token), Err(TokenError::BadSignature));
    }

    proptest! {
        #[test]
        fn prop_issue_then_verify_roundtrip(
            account_id in 1i32..1000000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)",
            admin in any::<bool>()
        ) {
            let role = if admin { Role::Admin } else { Role::User };
            let service = test_token_service();
            let token = service.issue(account_id, &email, role)?;
            let claims = service.verify(&token)?;
            prop_assert_eq!(claims.sub, account_id);
            prop_assert_eq!(claims.email, email);
            prop_assert_eq!(claims.role, role);
        }

        #[test]
        fn prop_random_strings_are_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert_eq!(service.verify(&malformed), Err(TokenError::Malformed));
        }
    }
}
