//! `PostgreSQL` request store for the maker-checker workflow.
//!
//! This crate provides a `PostgreSQL`-backed implementation of the
//! `RequestStore` trait from `maker-checker-core`:
//!
//! - Requests persisted in `approval_requests`, status stored as its numeric code
//! - Resolve compare-and-swap as a single conditional `UPDATE ... RETURNING`
//! - Listing ordered by `(created_at, id)` for stable offset pagination
//! - Embedded migrations
//!
//! # Example
//!
//! ```no_run
//! use maker_checker_postgres::PostgresRequestStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PostgresRequestStore::connect("postgres://localhost/maker_checker", 10).await?;
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod request_store;

pub use request_store::PostgresRequestStore;
