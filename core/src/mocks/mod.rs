//! Mock provider implementations for testing.
//!
//! This module provides simple, in-memory implementations of the provider
//! traits for use in unit and integration tests.

pub mod failing_store;
pub mod identity;

pub use failing_store::{FailingRequestStore, StallingRequestStore};
pub use identity::MockIdentityProvider;
