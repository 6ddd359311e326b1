use axum::http::HeaderValue;
use core_config::{ConfigError, FromEnv, env_or_default};
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Cross-origin settings, loaded from `CORS_ALLOWED_ORIGIN`.
#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origin: HeaderValue,
}

impl CorsConfig {
    pub fn new(allowed_origin: HeaderValue) -> Self {
        Self { allowed_origin }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::new(HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN))
    }
}

impl FromEnv for CorsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let origin = env_or_default("CORS_ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN);
        let allowed_origin = HeaderValue::from_str(&origin).map_err(|e| ConfigError::ParseError {
            key: "CORS_ALLOWED_ORIGIN".to_string(),
            details: e.to_string(),
        })?;

        Ok(Self { allowed_origin })
    }
}

/// Creates the CORS layer for the frontend origin.
///
/// Any method and header is accepted from that origin. Credentials are
/// allowed, so methods and headers are mirrored from the preflight request
/// rather than answered with `*`. Requests from other origins get no
/// `Access-Control-Allow-Origin` header at all.
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([config.allowed_origin.clone()]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
