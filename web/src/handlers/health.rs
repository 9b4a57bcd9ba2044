//! Health check endpoint.
//!
//! Used by load balancers and monitoring systems. Not behind the
//! authorization gate and does not touch the request store.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Health check body.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Health {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
}

/// Liveness check.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// { "status": "ok" }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<Health>) {
    (StatusCode::OK, Json(Health { status: "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, Json(body)) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
    }
}
