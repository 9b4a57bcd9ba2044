//! Identity provider trait.

use crate::error::Result;
use crate::state::Identity;

/// Identity provider.
///
/// Resolves an inbound credential into the caller's [`Identity`].
///
/// # Implementation Notes
///
/// - Resolution must be all-or-nothing: any missing or malformed claim fails
///   the whole credential
/// - Implementations should not log the credential itself
pub trait IdentityProvider: Send + Sync {
    /// Resolve a credential.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Credential is malformed, badly signed or expired → `CheckerError::Unauthenticated`
    /// - A required identity field is missing → `CheckerError::Unauthenticated`
    fn resolve(
        &self,
        credential: &str,
    ) -> impl std::future::Future<Output = Result<Identity>> + Send;
}
