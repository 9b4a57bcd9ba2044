//! HTTP request handlers.

pub mod health;
pub mod requests;

pub use health::health_check;
pub use requests::{get_request, list_requests, resolve_request, submit_request};
