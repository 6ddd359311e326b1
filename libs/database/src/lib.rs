//! PostgreSQL connectivity for the catalog services.
//!
//! # Features
//!
//! - `postgres` (default) - SeaORM connection pool, health check, migration runner
//! - `config` - `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use database::common::RetryPolicy;
//! use migration::Migrator;
//!
//! let db = postgres::connect_with_retry(PostgresConfig::from_env()?, RetryPolicy::default()).await?;
//! postgres::run_migrations::<Migrator>(&db, "catalog_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
