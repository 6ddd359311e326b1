//! Shared test utilities for the domain crates
//!
//! - `TestDatabase`: migrated PostgreSQL container with automatic cleanup (feature: "postgres")
//! - `TestDataBuilder`: deterministic, per-test unique names, slugs and usernames
//! - `assertions`: assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let slug = builder.slug("electronics");
//!     let username = builder.username("alice");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic per-test values.
///
/// Integration tests share one container per test, but values derived from
/// the test name stay distinct across tests and identical across runs.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (seed is a hash of the name)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_category");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Short token derived from the seed, fits inside every column limit
    fn tag(&self) -> String {
        format!("{:x}", self.seed % 0xFFFF_FFFF)
    }

    /// Category name, at most 100 characters for a short `base`
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(42);
    /// assert_eq!(builder.name("Phones"), "Phones 2a");
    /// ```
    pub fn name(&self, base: &str) -> String {
        format!("{} {}", base, self.tag())
    }

    pub fn slug(&self, base: &str) -> String {
        format!("{}-{}", base, self.tag())
    }

    /// Username, at most 50 characters for a short `base`
    pub fn username(&self, base: &str) -> String {
        format!("{}_{}", base, self.tag())
    }

    pub fn email(&self, base: &str) -> String {
        format!("{}.{}@example.com", base, self.tag())
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Unwrap an option with a readable failure message
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    pub fn assert_id_eq(actual: i32, expected: i32, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected id {}, got {}",
            context, expected, actual
        );
    }
}
