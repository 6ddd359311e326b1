use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// `token_type` returned alongside every issued token
pub const TOKEN_TYPE: &str = "bearer";

/// Decoded token payload.
///
/// `sub` carries the username; anything else passed to [`JwtAuth::issue`]
/// round-trips through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    pub iat: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("token has expired")]
    Expired,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token algorithm is not accepted")]
    InvalidAlgorithm,
    #[error("token is malformed: {0}")]
    Malformed(String),
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => AuthError::InvalidAlgorithm,
            _ => AuthError::Malformed(err.to_string()),
        }
    }
}

/// HS256 token issuer and verifier sharing one secret.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        if config.uses_default_secret() {
            tracing::warn!("JWT auth initialized with the default signing secret");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Expiry is compared explicitly in `verify` so that exp == now is already expired.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        tracing::info!(
            ttl_minutes = config.access_token_ttl.num_minutes(),
            "JWT auth initialized"
        );

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            default_ttl: config.access_token_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign `claims` with an expiry of `now + ttl` (default ttl when `None`).
    ///
    /// `exp` and `iat` in `claims` are overwritten. A non-string `sub` is
    /// stored in its JSON text form.
    pub fn issue(&self, mut claims: Map<String, Value>, ttl: Option<Duration>) -> Result<String, AuthError> {
        let now = Utc::now();
        let ttl = ttl.unwrap_or(self.default_ttl);

        let sub = match claims.remove("sub") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };
        claims.remove("exp");
        claims.remove("iat");

        let payload = TokenClaims {
            sub,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            extra: claims,
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Issue a default-lifetime token whose subject is `subject`.
    pub fn issue_for_subject(&self, subject: &str) -> Result<String, AuthError> {
        let mut claims = Map::new();
        claims.insert("sub".to_string(), Value::String(subject.to_string()));
        self.issue(claims, None)
    }

    /// Check signature and algorithm, then require `exp` to be strictly in the future.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation)?;

        if data.claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(data.claims)
    }
}
