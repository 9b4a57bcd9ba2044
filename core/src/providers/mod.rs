//! Collaborator traits.
//!
//! The engine depends on these traits, never on a concrete database client or
//! token library, so any backing implementation can be injected.
//!
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────┐
//! │ AuthorizationGate    │      │ RequestLifecycle     │
//! │  └─ IdentityProvider │ ───► │  └─ RequestStore     │
//! └──────────────────────┘      └──────────────────────┘
//!   credential → Identity         Identity + args → Request
//! ```
//!
//! This enables:
//! - **Testing**: in-memory stores and static identity providers
//! - **Production**: PostgreSQL store and JWT credentials

pub mod identity;
pub mod request_store;

pub use identity::IdentityProvider;
pub use request_store::RequestStore;
