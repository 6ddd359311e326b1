//! Token configuration, loaded through `core_config::FromEnv`.

use core_config::{ConfigError, FromEnv, env_parse};
use std::env;

use super::jwt::DEFAULT_TOKEN_TTL_MINUTES;

/// Signing secret used when `SECRET_KEY` is unset. Only suitable for local runs.
pub const DEFAULT_SECRET: &str = "mysecretkey";

/// JWT signing configuration.
///
/// Loaded from environment variables:
/// - `SECRET_KEY` - HS256 signing secret. Falls back to [`DEFAULT_SECRET`]
///   with a warning instead of failing startup.
/// - `ACCESS_TOKEN_EXPIRE_MINUTES` - token lifetime, default 30
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_ttl: chrono::Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_ttl: chrono::Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        }
    }

    pub fn with_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = match env::var("SECRET_KEY") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!(
                    "SECRET_KEY is not set, signing tokens with the built-in default secret"
                );
                DEFAULT_SECRET.to_string()
            }
        };

        let minutes = env_parse("ACCESS_TOKEN_EXPIRE_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?;

        Ok(Self {
            secret,
            access_token_ttl: chrono::Duration::minutes(minutes),
        })
    }
}
