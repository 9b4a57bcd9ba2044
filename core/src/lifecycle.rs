//! Request lifecycle engine.
//!
//! ```text
//! submit ──► Pending ──resolve──► Approved
//!               │
//!               └─────resolve──► Rejected
//! ```
//!
//! Every operation takes the resolved caller [`Identity`] explicitly and is
//! bounded by the caller's [`CancellationToken`] and the configured
//! operation timeout. No operation retries a failed store call.

use crate::bounded::bounded;
use crate::config::{LifecycleConfig, ResolvePolicy};
use crate::environment::Clock;
use crate::error::{CheckerError, Result};
use crate::providers::RequestStore;
use crate::query::{Pagination, RequestFilter, RequestQuery};
use crate::state::{Identity, NewRequest, Request, RequestId, RequestStatus};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Counter: requests submitted.
pub const METRIC_SUBMITTED: &str = "maker_checker.requests.submitted";
/// Counter: requests resolved, labelled by `status`.
pub const METRIC_RESOLVED: &str = "maker_checker.requests.resolved";
/// Counter: resolve attempts refused, labelled by `reason`.
pub const METRIC_RESOLVE_REJECTED: &str = "maker_checker.requests.resolve_rejected";

/// The request state machine.
///
/// # Type Parameters
///
/// - `S`: Request store
pub struct RequestLifecycle<S> {
    store: S,
    clock: Arc<dyn Clock>,
    config: LifecycleConfig,
}

impl<S: RequestStore> RequestLifecycle<S> {
    /// Create a lifecycle engine.
    #[must_use]
    pub fn new(store: S, clock: Arc<dyn Clock>, config: LifecycleConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration.
    pub const fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Submit a new request on behalf of `caller`.
    ///
    /// The maker is always `caller.id`; the request starts `Pending`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `target_id` or `payload` is empty → `CheckerError::ValidationFailed`
    /// - The store write fails → `CheckerError::StorageFailure`
    /// - `cancel` fires or the write times out → `CheckerError::Cancelled`
    #[tracing::instrument(skip(self, payload, cancel), fields(maker_id = %caller.id))]
    pub async fn submit_request(
        &self,
        caller: &Identity,
        target_id: &str,
        payload: &str,
        cancel: &CancellationToken,
    ) -> Result<Request> {
        if target_id.is_empty() {
            return Err(CheckerError::ValidationFailed(
                "target_id must not be empty".to_string(),
            ));
        }
        if payload.is_empty() {
            return Err(CheckerError::ValidationFailed(
                "payload must not be empty".to_string(),
            ));
        }

        let new_request = NewRequest {
            maker_id: caller.id.clone(),
            target_id: target_id.to_string(),
            payload: payload.to_string(),
            status: RequestStatus::Pending,
            created_at: self.clock.now(),
        };

        let request = bounded(
            "submit_request",
            cancel,
            self.config.operation_timeout,
            self.store.create(new_request),
        )
        .await?;

        metrics::counter!(METRIC_SUBMITTED).increment(1);
        tracing::info!(
            request_id = %request.id,
            maker_id = %request.maker_id,
            target_id = %request.target_id,
            status = %request.status,
            "Request submitted"
        );

        Ok(request)
    }

    /// Resolve a pending request to `desired`.
    ///
    /// Checks run in this order, stopping at the first failure:
    /// 1. The request must exist
    /// 2. The caller must satisfy the resolve policy
    /// 3. The request must still be `Pending`
    /// 4. `desired` must be `Approved` or `Rejected` (checked before any write)
    /// 5. The compare-and-swap from `Pending` must win
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No such request → `CheckerError::NotFound`
    /// - Policy is `TargetOnly` and caller is not the target → `CheckerError::Forbidden`
    /// - Request already resolved → `CheckerError::InvalidTransition`
    /// - `desired` is `Pending` → `CheckerError::ValidationFailed`
    /// - A concurrent resolve won → `CheckerError::Conflict`
    /// - The store fails → `CheckerError::StorageFailure`
    /// - `cancel` fires or a store call times out → `CheckerError::Cancelled`
    #[tracing::instrument(skip(self, cancel), fields(caller_id = %caller.id))]
    pub async fn resolve_request(
        &self,
        caller: &Identity,
        id: &RequestId,
        desired: RequestStatus,
        cancel: &CancellationToken,
    ) -> Result<Request> {
        let current = bounded(
            "load_request",
            cancel,
            self.config.operation_timeout,
            self.store.get_by_id(id),
        )
        .await?;

        if self.config.resolve_policy == ResolvePolicy::TargetOnly && current.target_id != caller.id
        {
            return Err(self.refuse(
                "forbidden",
                CheckerError::Forbidden(format!(
                    "only the target of request {id} may resolve it"
                )),
            ));
        }

        if current.status != RequestStatus::Pending {
            return Err(self.refuse(
                "not_pending",
                CheckerError::InvalidTransition {
                    id: id.clone(),
                    status: current.status,
                },
            ));
        }

        if !desired.is_terminal() {
            return Err(self.refuse(
                "invalid_status",
                CheckerError::ValidationFailed(format!(
                    "requests can only be resolved to approved or rejected, not {desired}"
                )),
            ));
        }

        let resolved = bounded(
            "resolve_request",
            cancel,
            self.config.operation_timeout,
            self.store
                .conditional_update_status(id, RequestStatus::Pending, desired),
        )
        .await
        .map_err(|e| match e {
            CheckerError::Conflict(_) => self.refuse("conflict", e),
            other => other,
        })?;

        metrics::counter!(METRIC_RESOLVED, "status" => desired.as_str()).increment(1);
        tracing::info!(
            request_id = %resolved.id,
            maker_id = %resolved.maker_id,
            target_id = %resolved.target_id,
            status = %resolved.status,
            "Request resolved"
        );

        Ok(resolved)
    }

    /// Get a request by id.
    ///
    /// No ownership filtering is applied: any authenticated caller may read
    /// any request.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No such request → `CheckerError::NotFound`
    /// - The store fails → `CheckerError::StorageFailure`
    /// - `cancel` fires or the read times out → `CheckerError::Cancelled`
    pub async fn get_request(
        &self,
        caller: &Identity,
        id: &RequestId,
        cancel: &CancellationToken,
    ) -> Result<Request> {
        tracing::debug!(caller_id = %caller.id, request_id = %id, "Getting request");

        bounded(
            "get_request",
            cancel,
            self.config.operation_timeout,
            self.store.get_by_id(id),
        )
        .await
    }

    /// List requests matching `filter`, one page at a time.
    ///
    /// See [`RequestQuery::build`] for how filters and pagination are
    /// normalised.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The store fails → `CheckerError::StorageFailure`
    /// - `cancel` fires or the read times out → `CheckerError::Cancelled`
    pub async fn list_requests(
        &self,
        caller: &Identity,
        filter: RequestFilter,
        pagination: Pagination,
        cancel: &CancellationToken,
    ) -> Result<Vec<Request>> {
        let query = RequestQuery::build(filter, pagination, self.config.default_page_limit);
        tracing::debug!(caller_id = %caller.id, ?query, "Listing requests");

        bounded(
            "list_requests",
            cancel,
            self.config.operation_timeout,
            self.store.find(&query),
        )
        .await
    }

    fn refuse(&self, reason: &'static str, error: CheckerError) -> CheckerError {
        metrics::counter!(METRIC_RESOLVE_REJECTED, "reason" => reason).increment(1);
        tracing::info!(reason, policy = %self.config.resolve_policy, %error, "Resolve refused");
        error
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for RequestLifecycle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLifecycle")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
