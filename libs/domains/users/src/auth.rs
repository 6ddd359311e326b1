//! Bearer-token identity for user routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_helpers::{AuthError, JwtAuth, TokenClaims, extract_bearer_token};
use std::sync::Arc;

use crate::error::UserError;
use crate::models::User;
use crate::repository::UserRepository;
use crate::service::UserService;

/// Checks a bearer token and returns its claims.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

impl TokenVerifier for JwtAuth {
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        JwtAuth::verify(self, token)
    }
}

/// Router state shared by the user handlers.
///
/// `tokens` issues tokens at login; `verifier` checks them on protected routes
/// and defaults to the same `JwtAuth`.
pub struct UserState<R: UserRepository> {
    pub service: Arc<UserService<R>>,
    pub tokens: Arc<JwtAuth>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl<R: UserRepository> Clone for UserState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            tokens: Arc::clone(&self.tokens),
            verifier: Arc::clone(&self.verifier),
        }
    }
}

impl<R: UserRepository> UserState<R> {
    pub fn new(service: UserService<R>, tokens: JwtAuth) -> Self {
        let tokens = Arc::new(tokens);
        let verifier: Arc<dyn TokenVerifier> = tokens.clone();
        Self {
            service: Arc::new(service),
            tokens,
            verifier,
        }
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.verifier = verifier;
        self
    }
}

/// The active user named by the request's bearer token.
///
/// Every failure (no header, bad or expired token, no subject, unknown or
/// inactive user) rejects with the same 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<R> FromRequestParts<UserState<R>> for CurrentUser
where
    R: UserRepository + 'static,
{
    type Rejection = UserError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &UserState<R>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)
            .ok_or_else(|| UserError::Unauthorized("missing bearer token".into()))?;

        let claims = state
            .verifier
            .verify(token)
            .map_err(|e| UserError::Unauthorized(e.to_string()))?;

        let subject = claims
            .sub
            .ok_or_else(|| UserError::Unauthorized("token has no subject".into()))?;

        let user = state.service.active_user(&subject).await?;
        Ok(CurrentUser(user))
    }
}
