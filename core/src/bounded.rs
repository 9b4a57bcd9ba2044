//! Bounding collaborator calls by cancellation and timeout.

use crate::error::{CheckerError, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Run `operation`, failing with `Cancelled` if `cancel` fires or `timeout`
/// elapses first.
///
/// Cancellation is checked before the operation is polled, so an already
/// cancelled token never reaches the collaborator.
///
/// # Errors
///
/// Returns `CheckerError::Cancelled` on cancellation or timeout, otherwise
/// whatever `operation` returns.
pub async fn bounded<T, F>(
    operation: &'static str,
    cancel: &CancellationToken,
    timeout: Duration,
    future: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::debug!(operation, "operation cancelled by caller");
            Err(CheckerError::Cancelled(format!("{operation} cancelled")))
        }
        outcome = tokio::time::timeout(timeout, future) => {
            outcome.unwrap_or_else(|_| {
                tracing::warn!(operation, timeout_ms = timeout.as_millis(), "operation timed out");
                Err(CheckerError::Cancelled(format!(
                    "{operation} timed out after {}ms",
                    timeout.as_millis()
                )))
            })
        }
    }
}
