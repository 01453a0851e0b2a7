// Environment configuration for the Account API

use std::fmt;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_JWT_ISSUER: &str = "account-api";
pub const DEFAULT_JWT_TTL_HOURS: i64 = 24;
/// One year
pub const MAX_JWT_TTL_HOURS: i64 = 24 * 366;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Signing configuration handed to the token service
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_hours: i64,
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub token: TokenConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let secret = lookup("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let issuer = lookup("JWT_ISSUER")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_string());

        let ttl_hours = match lookup("JWT_TTL_HOURS") {
            Some(raw) => {
                let hours = raw.trim().parse::<i64>().map_err(|e| ConfigError::Invalid {
                    name: "JWT_TTL_HOURS",
                    reason: e.to_string(),
                })?;
                if !(1..=MAX_JWT_TTL_HOURS).contains(&hours) {
                    return Err(ConfigError::Invalid {
                        name: "JWT_TTL_HOURS",
                        reason: format!("must be between 1 and {} hours", MAX_JWT_TTL_HOURS),
                    });
                }
                hours
            }
            None => DEFAULT_JWT_TTL_HOURS,
        };

        Ok(Self {
            database_url,
            host,
            port,
            token: TokenConfig {
                secret,
                issuer,
                ttl_hours,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
