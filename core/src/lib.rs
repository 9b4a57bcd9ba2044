//! # Maker-Checker Core
//!
//! A single-step approval workflow: a maker submits a request addressed to a
//! checker, and the request is resolved exactly once to approved or rejected.
//!
//! ## Components
//!
//! - **Identity Context** ([`credentials`]): credential → [`Identity`]
//! - **Authorization Gate** ([`gate`]): no operation runs for an
//!   unauthenticated caller
//! - **Request Lifecycle Engine** ([`lifecycle`]): the state machine
//! - **Query/Filter Layer** ([`query`]): optional filters and pagination →
//!   bounded, deterministic store query
//!
//! Storage and identity are reached through the [`providers`] traits, so the
//! engine never depends on a concrete database or token library.
//!
//! ## Example
//!
//! ```
//! use maker_checker_core::environment::SystemClock;
//! use maker_checker_core::stores::InMemoryRequestStore;
//! use maker_checker_core::{Identity, LifecycleConfig, RequestLifecycle, RequestStatus};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let engine = RequestLifecycle::new(
//!     InMemoryRequestStore::new(),
//!     Arc::new(SystemClock),
//!     LifecycleConfig::default(),
//! );
//! let cancel = CancellationToken::new();
//! let alice = Identity::new("alice", "Alice", "alice@example.com");
//! let bob = Identity::new("bob", "Bob", "bob@example.com");
//!
//! let request = engine.submit_request(&alice, "bob", "hello", &cancel).await?;
//! assert_eq!(request.status, RequestStatus::Pending);
//!
//! let request = engine
//!     .resolve_request(&bob, &request.id, RequestStatus::Approved, &cancel)
//!     .await?;
//! assert_eq!(request.status, RequestStatus::Approved);
//! # Ok::<(), maker_checker_core::CheckerError>(())
//! # }).unwrap();
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod bounded;
pub mod config;
pub mod credentials;
pub mod environment;
pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod providers;
pub mod query;
pub mod state;
pub mod stores;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use config::{CredentialConfig, LifecycleConfig, ResolvePolicy};
pub use credentials::JwtIdentityProvider;
pub use error::{CheckerError, ErrorKind, Result};
pub use gate::AuthorizationGate;
pub use lifecycle::RequestLifecycle;
pub use providers::{IdentityProvider, RequestStore};
pub use query::{Pagination, RequestFilter, RequestQuery};
pub use state::{Identity, NewRequest, Request, RequestId, RequestStatus};
