//! Mock identity provider for testing.

use crate::error::{CheckerError, Result};
use crate::providers::IdentityProvider;
use crate::state::Identity;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock identity provider.
///
/// Maps literal credential strings to identities. Unknown credentials are
/// `Unauthenticated`.
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    identities: Arc<Mutex<HashMap<String, Identity>>>,
    calls: Arc<AtomicUsize>,
}

impl MockIdentityProvider {
    /// Create a provider that knows no credentials.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a credential (builder style).
    #[must_use]
    pub fn with_identity(self, credential: impl Into<String>, identity: Identity) -> Self {
        self.insert(credential, identity);
        self
    }

    /// Register a credential.
    pub fn insert(&self, credential: impl Into<String>, identity: Identity) {
        if let Ok(mut identities) = self.identities.lock() {
            identities.insert(credential.into(), identity);
        }
    }

    /// Number of `resolve` calls so far (for testing).
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IdentityProvider for MockIdentityProvider {
    async fn resolve(&self, credential: &str) -> Result<Identity> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let identities = self
            .identities
            .lock()
            .map_err(|e| CheckerError::StorageFailure(format!("identity map lock poisoned: {e}")))?;

        identities
            .get(credential)
            .cloned()
            .ok_or_else(|| CheckerError::Unauthenticated("unknown credential".to_string()))
    }
}
