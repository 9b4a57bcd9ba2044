//! Axum HTTP surface for the maker-checker workflow.
//!
//! Handlers stay thin: extract, call the [`RequestLifecycle`], map the
//! result. The authorization gate runs inside the [`Caller`] extractor, so
//! no handler body runs for an unauthenticated request.
//!
//! ```text
//! HTTP request
//!   → correlation id + trace span
//!   → Caller extractor (AuthorizationGate)
//!   → handler → RequestLifecycle → RequestStore
//!   → Envelope { data, message } | AppError { code, message }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use maker_checker_web::{build_router, AppState};
//!
//! let state = AppState::new(lifecycle, gate);
//! let app = build_router(state);
//! axum::serve(listener, app).await?;
//! ```
//!
//! [`RequestLifecycle`]: maker_checker_core::RequestLifecycle

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;

// Re-export key types for convenience
pub use config::{ConfigError, ServerConfig};
pub use dto::Envelope;
pub use error::AppError;
pub use extractors::{Caller, CorrelationId};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
pub use router::build_router;
pub use state::AppState;
