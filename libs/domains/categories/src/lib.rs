//! Categories Domain
//!
//! A self-referencing category hierarchy: each category may point at a parent,
//! and `(name, level)` and `slug` are unique across the table.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /api/category endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← not-found handling, hierarchy rules
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + Postgres / in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Category, CreateCategory, UpdateCategory
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_categories::{handlers, CategoryService, InMemoryCategoryRepository};
//!
//! let service = CategoryService::new(InMemoryCategoryRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod rules;
pub mod service;

pub use error::{CategoryError, CategoryResult};
pub use models::{Category, CategoryDeleted, CreateCategory, UpdateCategory};
pub use postgres::PgCategoryRepository;
pub use repository::{CategoryRepository, InMemoryCategoryRepository};
pub use service::CategoryService;
