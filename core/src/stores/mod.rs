//! Request store implementations shipped with the core.
//!
//! - **In-memory** - insertion-ordered store for tests and single-process
//!   deployments without a database
//!
//! The PostgreSQL store lives in the `maker-checker-postgres` crate.

pub mod memory;

pub use memory::InMemoryRequestStore;
