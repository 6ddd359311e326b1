//! Token issuance and verification for bearer authentication.
//!
//! This crate only knows about tokens. Mapping a verified subject to a user
//! lives in the users domain, which owns the user store.
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig};
//! use core_config::FromEnv;
//!
//! let tokens = JwtAuth::new(&JwtConfig::from_env()?);
//! let token = tokens.issue_for_subject("alice")?;
//! let claims = tokens.verify(&token)?;
//! assert_eq!(claims.sub.as_deref(), Some("alice"));
//! ```

pub mod bearer;
pub mod config;
pub mod jwt;

pub use bearer::extract_bearer_token;
pub use config::JwtConfig;
pub use jwt::{AuthError, DEFAULT_TOKEN_TTL_MINUTES, JwtAuth, TOKEN_TYPE, TokenClaims};
