//! In-memory request store.

use crate::error::{CheckerError, Result};
use crate::providers::RequestStore;
use crate::query::RequestQuery;
use crate::state::{NewRequest, Request, RequestId, RequestStatus};
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory request store.
///
/// Requests are kept in insertion order, which is also the order `find`
/// returns them in. The status compare-and-swap runs under a single lock
/// acquisition, so two concurrent resolves cannot both succeed.
///
/// Cloning shares the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRequestStore {
    requests: Arc<Mutex<Vec<Request>>>,
}

impl InMemoryRequestStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored requests.
    ///
    /// # Errors
    ///
    /// Returns `CheckerError::StorageFailure` if the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Returns `true` if nothing has been stored.
    ///
    /// # Errors
    ///
    /// Returns `CheckerError::StorageFailure` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Request>>> {
        self.requests
            .lock()
            .map_err(|e| CheckerError::StorageFailure(format!("request store lock poisoned: {e}")))
    }
}

impl RequestStore for InMemoryRequestStore {
    async fn create(&self, request: NewRequest) -> Result<Request> {
        let stored = request.into_request(RequestId::generate());
        self.lock()?.push(stored.clone());
        Ok(stored)
    }

    async fn conditional_update_status(
        &self,
        id: &RequestId,
        expected: RequestStatus,
        new: RequestStatus,
    ) -> Result<Request> {
        let mut requests = self.lock()?;

        let Some(request) = requests.iter_mut().find(|r| &r.id == id) else {
            return Err(CheckerError::NotFound(id.clone()));
        };

        if request.status != expected {
            return Err(CheckerError::Conflict(id.clone()));
        }

        request.status = new;
        Ok(request.clone())
    }

    async fn find(&self, query: &RequestQuery) -> Result<Vec<Request>> {
        let requests = self.lock()?;

        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);

        Ok(requests
            .iter()
            .filter(|r| query.matches(r))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &RequestId) -> Result<Request> {
        self.lock()?
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| CheckerError::NotFound(id.clone()))
    }
}
