//! Users Domain
//!
//! User accounts with password login and bearer-token identity.
//!
//! # Features
//!
//! - User CRUD with partial updates
//! - Password hashing with Argon2id
//! - Token login and the [`auth::CurrentUser`] extractor
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /users endpoints, CurrentUser extractor
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← password hashing, merge, login
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + Postgres / in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User, UserResponse, CreateUser, UpdateUser
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let tokens = JwtAuth::new(&JwtConfig::new("change-me"));
//! let router = handlers::router(service, tokens);
//! ```

pub mod auth;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod patch;
pub mod postgres;
pub mod repository;
pub mod service;

pub use auth::{CurrentUser, TokenVerifier};
pub use error::{UserError, UserResult};
pub use models::{CreateUser, LoginRequest, NewUser, TokenResponse, UpdateUser, User, UserResponse};
pub use patch::Patch;
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
