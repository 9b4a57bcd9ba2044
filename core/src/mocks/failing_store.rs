//! Request stores that misbehave on purpose.

use crate::error::{CheckerError, Result};
use crate::providers::RequestStore;
use crate::query::RequestQuery;
use crate::state::{NewRequest, Request, RequestId, RequestStatus};

/// Store whose every call fails with `StorageFailure`.
#[derive(Debug, Clone)]
pub struct FailingRequestStore {
    message: String,
}

impl FailingRequestStore {
    /// Create a failing store with the given failure message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn failure(&self) -> CheckerError {
        CheckerError::StorageFailure(self.message.clone())
    }
}

impl Default for FailingRequestStore {
    fn default() -> Self {
        Self::new("connection refused")
    }
}

impl RequestStore for FailingRequestStore {
    async fn create(&self, _request: NewRequest) -> Result<Request> {
        Err(self.failure())
    }

    async fn conditional_update_status(
        &self,
        _id: &RequestId,
        _expected: RequestStatus,
        _new: RequestStatus,
    ) -> Result<Request> {
        Err(self.failure())
    }

    async fn find(&self, _query: &RequestQuery) -> Result<Vec<Request>> {
        Err(self.failure())
    }

    async fn get_by_id(&self, _id: &RequestId) -> Result<Request> {
        Err(self.failure())
    }
}

/// Store whose every call never completes.
///
/// Used to exercise operation timeouts and cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StallingRequestStore;

impl RequestStore for StallingRequestStore {
    async fn create(&self, _request: NewRequest) -> Result<Request> {
        std::future::pending().await
    }

    async fn conditional_update_status(
        &self,
        _id: &RequestId,
        _expected: RequestStatus,
        _new: RequestStatus,
    ) -> Result<Request> {
        std::future::pending().await
    }

    async fn find(&self, _query: &RequestQuery) -> Result<Vec<Request>> {
        std::future::pending().await
    }

    async fn get_by_id(&self, _id: &RequestId) -> Result<Request> {
        std::future::pending().await
    }
}
