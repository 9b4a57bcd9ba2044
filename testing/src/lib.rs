//! # Maker-Checker Testing
//!
//! Testing utilities shared by the workspace's test suites.
//!
//! This crate provides:
//! - A controllable clock
//! - Identity fixtures and signed credentials for them
//! - Ready-made lifecycle engines over the in-memory store
//! - proptest strategies for domain types
//!
//! ## Example
//!
//! ```
//! use maker_checker_testing::{alice, bearer, test_clock};
//!
//! let clock = test_clock();
//! let header = bearer(&alice(), &clock);
//! assert!(header.starts_with("Bearer "));
//! ```

use chrono::{DateTime, Utc};
use maker_checker_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, PoisonError, RwLock};

    /// Fixed clock for deterministic tests
    ///
    /// Returns the same time until explicitly moved. Clones share the time,
    /// so a clock handed to an engine can still be advanced by the test.
    ///
    /// # Example
    ///
    /// ```
    /// use maker_checker_testing::mocks::FixedClock;
    /// use maker_checker_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// assert_eq!(time1, clock.now());
    ///
    /// clock.advance(Duration::hours(3));
    /// assert_eq!(clock.now(), time1 + Duration::hours(3));
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: Arc<RwLock<DateTime<Utc>>>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(RwLock::new(time)),
            }
        }

        /// Move the clock forward.
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.write().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.read().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Identity and credential fixtures.
pub mod fixtures {
    use super::mocks::FixedClock;
    use maker_checker_core::{CredentialConfig, Identity, JwtIdentityProvider};
    use std::sync::Arc;

    /// Signing key used by every test credential.
    pub const TEST_SIGNING_KEY: &str = "maker-checker-test-signing-key";

    /// The usual maker.
    #[must_use]
    pub fn alice() -> Identity {
        Identity::new("alice", "Alice", "alice@example.com")
    }

    /// The usual checker.
    #[must_use]
    pub fn bob() -> Identity {
        Identity::new("bob", "Bob", "bob@example.com")
    }

    /// A bystander: neither maker nor target.
    #[must_use]
    pub fn carol() -> Identity {
        Identity::new("carol", "Carol", "carol@example.com")
    }

    /// Credential configuration signed with [`TEST_SIGNING_KEY`].
    #[must_use]
    pub fn credential_config() -> CredentialConfig {
        CredentialConfig::new(TEST_SIGNING_KEY)
    }

    /// JWT provider over the test key and the given clock.
    #[must_use]
    pub fn jwt_provider(clock: &FixedClock) -> JwtIdentityProvider {
        JwtIdentityProvider::new(credential_config(), Arc::new(clock.clone()))
    }

    /// Signed credential for `identity`, issued at the clock's current time.
    ///
    /// # Panics
    ///
    /// Panics if `identity` has an empty id.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn credential(identity: &Identity, clock: &FixedClock) -> String {
        jwt_provider(clock)
            .issue(identity)
            .expect("test identity should have an id")
    }

    /// `Authorization` header value carrying a credential for `identity`.
    #[must_use]
    pub fn bearer(identity: &Identity, clock: &FixedClock) -> String {
        format!("Bearer {}", credential(identity, clock))
    }
}

/// Ready-made engines.
pub mod helpers {
    use super::mocks::FixedClock;
    use maker_checker_core::stores::InMemoryRequestStore;
    use maker_checker_core::{LifecycleConfig, RequestLifecycle};
    use std::sync::Arc;

    /// Lifecycle engine over a fresh in-memory store.
    #[must_use]
    pub fn in_memory_lifecycle(
        clock: &FixedClock,
        config: LifecycleConfig,
    ) -> RequestLifecycle<InMemoryRequestStore> {
        RequestLifecycle::new(InMemoryRequestStore::new(), Arc::new(clock.clone()), config)
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use maker_checker_core::{Pagination, RequestStatus};
    use proptest::prelude::*;

    /// Any status.
    pub fn any_status() -> impl Strategy<Value = RequestStatus> {
        prop_oneof![
            Just(RequestStatus::Pending),
            Just(RequestStatus::Approved),
            Just(RequestStatus::Rejected),
        ]
    }

    /// A terminal status: a valid resolve target.
    pub fn terminal_status() -> impl Strategy<Value = RequestStatus> {
        prop_oneof![Just(RequestStatus::Approved), Just(RequestStatus::Rejected)]
    }

    /// Raw caller pagination, including absent, zero and negative values.
    pub fn raw_pagination() -> impl Strategy<Value = Pagination> {
        (
            proptest::option::of(-50i64..50),
            proptest::option::of(-50i64..50),
        )
            .prop_map(|(skip, limit)| Pagination { skip, limit })
    }
}

// Re-export commonly used items
pub use fixtures::{TEST_SIGNING_KEY, alice, bearer, bob, carol, credential, jwt_provider};
pub use helpers::in_memory_lifecycle;
pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use maker_checker_core::IdentityProvider;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_clones_share_time() {
        let clock = test_clock();
        let shared = clock.clone();
        clock.advance(chrono::Duration::minutes(5));
        assert_eq!(shared.now(), clock.now());
    }

    #[tokio::test]
    async fn test_credential_resolves_to_identity() {
        let clock = test_clock();
        let token = credential(&alice(), &clock);
        let identity = jwt_provider(&clock).resolve(&token).await.unwrap();
        assert_eq!(identity, alice());
    }
}
