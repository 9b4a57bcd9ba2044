//! Application state for Axum handlers.

use maker_checker_core::{AuthorizationGate, IdentityProvider, RequestLifecycle, RequestStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Application state shared across all HTTP handlers.
///
/// Generic over the request store `S` and identity provider `P`, so the same
/// router serves the PostgreSQL and in-memory deployments as well as tests.
pub struct AppState<S, P> {
    /// Request lifecycle engine.
    pub lifecycle: Arc<RequestLifecycle<S>>,
    /// Authorization gate run by the [`Caller`](crate::extractors::Caller) extractor.
    pub gate: Arc<AuthorizationGate<P>>,
    /// Parent of every caller's cancellation token. Cancelling it fails all
    /// in-flight operations with `Cancelled`.
    pub cancel: CancellationToken,
}

impl<S, P> AppState<S, P>
where
    S: RequestStore,
    P: IdentityProvider,
{
    /// Create application state.
    #[must_use]
    pub fn new(lifecycle: RequestLifecycle<S>, gate: AuthorizationGate<P>) -> Self {
        Self {
            lifecycle: Arc::new(lifecycle),
            gate: Arc::new(gate),
            cancel: CancellationToken::new(),
        }
    }

    /// Use `cancel` as the parent of every caller's cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

// Manual impl: cloning shares the Arcs and needs no `S: Clone` / `P: Clone`.
impl<S, P> Clone for AppState<S, P> {
    fn clone(&self) -> Self {
        Self {
            lifecycle: Arc::clone(&self.lifecycle),
            gate: Arc::clone(&self.gate),
            cancel: self.cancel.clone(),
        }
    }
}
