//! Authorization gate.
//!
//! The single enforcement point for "caller must be authenticated". Every
//! lifecycle and query operation runs behind it; the operations themselves
//! only make the ownership checks specific to their transition.

use crate::bounded::bounded;
use crate::error::{CheckerError, Result};
use crate::providers::IdentityProvider;
use crate::state::Identity;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default bound on a single identity resolution.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Extract the credential from an `Authorization` header value.
///
/// The value must be exactly `Bearer <token>`: the scheme, one space and a
/// non-empty token.
///
/// # Examples
///
/// ```
/// use maker_checker_core::gate::bearer_token;
///
/// assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
/// assert_eq!(bearer_token("Basic dXNlcg=="), None);
/// assert_eq!(bearer_token("Bearer"), None);
/// ```
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

/// Authorization gate.
///
/// Resolves the caller through an [`IdentityProvider`] and only then runs the
/// wrapped operation.
#[derive(Debug, Clone)]
pub struct AuthorizationGate<P> {
    provider: P,
    timeout: Duration,
}

impl<P: IdentityProvider> AuthorizationGate<P> {
    /// Create a gate around an identity provider.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }

    /// Set the identity resolution timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The wrapped identity provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolve the caller from an `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Header is missing or not `Bearer <token>` → `CheckerError::Unauthenticated`
    /// - The provider rejects the credential, or fails in any other way →
    ///   `CheckerError::Unauthenticated`
    /// - `cancel` fires or the resolution times out → `CheckerError::Cancelled`
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Identity> {
        let Some(header) = authorization else {
            tracing::debug!("missing authorization header");
            return Err(CheckerError::Unauthenticated(
                "missing authorization header".to_string(),
            ));
        };

        let Some(credential) = bearer_token(header) else {
            tracing::debug!("malformed authorization header");
            return Err(CheckerError::Unauthenticated(
                "authorization header must be 'Bearer <token>'".to_string(),
            ));
        };

        match bounded(
            "resolve_identity",
            cancel,
            self.timeout,
            self.provider.resolve(credential),
        )
        .await
        {
            Ok(identity) => Ok(identity),
            Err(CheckerError::Cancelled(reason)) => Err(CheckerError::Cancelled(reason)),
            Err(CheckerError::Unauthenticated(reason)) => {
                Err(CheckerError::Unauthenticated(reason))
            }
            Err(other) => {
                tracing::warn!(error = %other, "identity provider failed");
                Err(CheckerError::Unauthenticated(
                    "identity could not be resolved".to_string(),
                ))
            }
        }
    }

    /// Authenticate, then run `operation` with the resolved identity.
    ///
    /// `operation` is never invoked when authentication fails.
    ///
    /// # Errors
    ///
    /// Returns the authentication error, or whatever `operation` returns.
    pub async fn guard<T, F, Fut>(
        &self,
        authorization: Option<&str>,
        cancel: &CancellationToken,
        operation: F,
    ) -> Result<T>
    where
        F: FnOnce(Identity) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let identity = self.authenticate(authorization, cancel).await?;
        operation(identity).await
    }
}
