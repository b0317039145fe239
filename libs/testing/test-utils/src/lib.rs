//! Shared test utilities for domain testing
//!
//! - `TestDataBuilder`: deterministic test data generation
//! - `assertions`: custom assertion helpers for domain results
//!
//! # Usage
//!
//! ```rust
//! use test_utils::TestDataBuilder;
//!
//! let builder = TestDataBuilder::from_test_name("test_create_account");
//!
//! let email = builder.email("ada");
//! let role_name = builder.name("role", "main");
//! assert!(email.ends_with("@example.com"));
//! assert!(role_name.starts_with("test-role-"));
//! ```

/// Builder for test data with deterministic randomization
///
/// Values derived from the same seed are always equal, values from
/// different seeds never collide, so tests sharing an in-memory store stay
/// independent.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// This is the recommended way to create a builder for consistent test data.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_role");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// # Arguments
    ///
    /// * `prefix` - The kind of aggregate (e.g., "role", "permission")
    /// * `suffix` - A unique identifier within the test (e.g., "main", "backup")
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(12345);
    /// assert_eq!(builder.name("role", "main"), "test-role-12345-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Generate a unique, well-formed e-mail address
    pub fn email(&self, local: &str) -> String {
        format!("{}.{:x}@example.com", local, self.seed)
    }

    /// Generate a token that fits the 36 character limit
    pub fn token(&self, suffix: &str) -> String {
        let token = format!("tok-{:x}-{}", self.seed, suffix);
        token.chars().take(36).collect()
    }

    /// A password long enough to pass validation
    pub fn password(&self) -> String {
        format!("pw-{:016x}", self.seed)
    }
}

/// Test assertion helpers
pub mod assertions {
    use core_domain::Error;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that `errors` carry exactly `expected`, in order
    pub fn assert_error_messages(errors: &[Error], expected: &[&str]) {
        let actual: Vec<&str> = errors.iter().map(Error::message).collect();
        assert_eq!(
            actual, expected,
            "expected errors {:?}, got {:?}",
            expected, actual
        );
    }
}
