//! Query/filter layer.
//!
//! Turns caller-supplied optional filters and a raw pagination window into a
//! normalised [`RequestQuery`] that a [`RequestStore`](crate::providers::RequestStore)
//! can execute without further interpretation.
//!
//! # Rules
//!
//! - A filter the caller did not send (or sent as an empty string) is left out
//! - Filtering by target implies `status = approved`, unless a status was
//!   requested explicitly
//! - `skip < 0` becomes 0; `limit <= 0` (or absent) becomes the default limit

use crate::state::{Request, RequestStatus};
use serde::{Deserialize, Serialize};

/// Optional equality filters supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFilter {
    /// Only requests addressed to this identity.
    pub target_id: Option<String>,
    /// Only requests submitted by this identity.
    pub maker_id: Option<String>,
    /// Only requests in this status.
    pub status: Option<RequestStatus>,
}

impl RequestFilter {
    /// Filter by target.
    #[must_use]
    pub fn with_target_id(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    /// Filter by maker.
    #[must_use]
    pub fn with_maker_id(mut self, maker_id: impl Into<String>) -> Self {
        self.maker_id = Some(maker_id.into());
        self
    }

    /// Filter by status.
    #[must_use]
    pub const fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Raw pagination window, as sent by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of items to skip.
    pub skip: Option<i64>,
    /// Maximum number of items to return.
    pub limit: Option<i64>,
}

impl Pagination {
    /// Create a pagination window.
    #[must_use]
    pub const fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip: Some(skip),
            limit: Some(limit),
        }
    }
}

/// Normalised query executed by a request store.
///
/// Every field left as `None` is absent from the query. `limit` is always
/// positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestQuery {
    /// Target equality filter.
    pub target_id: Option<String>,
    /// Maker equality filter.
    pub maker_id: Option<String>,
    /// Status equality filter.
    pub status: Option<RequestStatus>,
    /// Offset into the store ordering.
    pub skip: u64,
    /// Page size.
    pub limit: u64,
}

impl RequestQuery {
    /// Build a normalised query.
    ///
    /// # Arguments
    ///
    /// * `filter` - Caller filters
    /// * `pagination` - Caller pagination window
    /// * `default_limit` - Page size for absent or non-positive limits
    ///
    /// # Examples
    ///
    /// ```
    /// use maker_checker_core::query::{Pagination, RequestFilter, RequestQuery};
    /// use maker_checker_core::RequestStatus;
    ///
    /// let query = RequestQuery::build(
    ///     RequestFilter::default().with_target_id("bob"),
    ///     Pagination::new(-5, 0),
    ///     30,
    /// );
    ///
    /// assert_eq!(query.status, Some(RequestStatus::Approved));
    /// assert_eq!(query.skip, 0);
    /// assert_eq!(query.limit, 30);
    /// ```
    #[must_use]
    pub fn build(filter: RequestFilter, pagination: Pagination, default_limit: u64) -> Self {
        let target_id = non_empty(filter.target_id);
        let maker_id = non_empty(filter.maker_id);

        let status = match (&target_id, filter.status) {
            (_, Some(explicit)) => Some(explicit),
            (Some(_), None) => Some(RequestStatus::Approved),
            (None, None) => None,
        };

        let skip = pagination
            .skip
            .and_then(|skip| u64::try_from(skip).ok())
            .unwrap_or(0);

        let limit = pagination
            .limit
            .and_then(|limit| u64::try_from(limit).ok())
            .filter(|limit| *limit > 0)
            .unwrap_or_else(|| default_limit.max(1));

        Self {
            target_id,
            maker_id,
            status,
            skip,
            limit,
        }
    }

    /// Returns `true` if `request` satisfies every filter in the query.
    ///
    /// Pagination is not considered.
    #[must_use]
    pub fn matches(&self, request: &Request) -> bool {
        self.target_id
            .as_deref()
            .is_none_or(|target| request.target_id == target)
            && self
                .maker_id
                .as_deref()
                .is_none_or(|maker| request.maker_id == maker)
            && self.status.is_none_or(|status| request.status == status)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
