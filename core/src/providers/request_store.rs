//! Request store trait.

use crate::error::Result;
use crate::query::RequestQuery;
use crate::state::{NewRequest, Request, RequestId, RequestStatus};

/// Request store.
///
/// This trait abstracts over durable request storage (PostgreSQL, in-memory).
///
/// # Implementation Notes
///
/// - Ids are opaque strings assigned by the store
/// - `conditional_update_status` must be atomic (compare-and-swap), never a
///   read followed by a separate write
/// - `find` ordering is store-defined but must be stable while no writes
///   happen, so offset pagination does not skip or repeat items
pub trait RequestStore: Send + Sync {
    /// Persist a new request and assign its id.
    ///
    /// # Errors
    ///
    /// Returns `CheckerError::StorageFailure` if the write fails.
    fn create(
        &self,
        request: NewRequest,
    ) -> impl std::future::Future<Output = Result<Request>> + Send;

    /// Atomically set `status` to `new` if it currently equals `expected`.
    ///
    /// # Returns
    ///
    /// The updated request.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No request has this id → `CheckerError::NotFound`
    /// - The stored status differs from `expected` → `CheckerError::Conflict`
    /// - The write fails → `CheckerError::StorageFailure`
    fn conditional_update_status(
        &self,
        id: &RequestId,
        expected: RequestStatus,
        new: RequestStatus,
    ) -> impl std::future::Future<Output = Result<Request>> + Send;

    /// Find requests matching a normalised query.
    ///
    /// # Errors
    ///
    /// Returns `CheckerError::StorageFailure` if the read fails.
    fn find(
        &self,
        query: &RequestQuery,
    ) -> impl std::future::Future<Output = Result<Vec<Request>>> + Send;

    /// Get a request by id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No request has this id → `CheckerError::NotFound`
    /// - The read fails → `CheckerError::StorageFailure`
    fn get_by_id(
        &self,
        id: &RequestId,
    ) -> impl std::future::Future<Output = Result<Request>> + Send;
}
