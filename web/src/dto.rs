//! Request and response bodies for the `/messages` routes.
//!
//! Field names accept both the current names (`target_id`, `payload`,
//! `maker_id`) and the legacy ones (`receiver_id`, `text`, `sender_id`).

use crate::error::AppError;
use maker_checker_core::{CheckerError, Pagination, RequestFilter, RequestStatus};
use serde::{Deserialize, Serialize};

/// Success envelope: `{ "data": ..., "message": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope<T> {
    /// Response payload.
    pub data: T,
    /// Human-readable outcome.
    pub message: String,
}

impl<T> Envelope<T> {
    /// Wrap `data` with a message.
    #[must_use]
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }
}

/// Body of `POST /messages`.
///
/// Unknown fields, including any maker id the client sends, are ignored.
/// Missing fields deserialize as empty and fail validation in the engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitBody {
    /// Intended checker.
    #[serde(default, alias = "receiver_id")]
    pub target_id: String,
    /// Request content.
    #[serde(default, alias = "text")]
    pub payload: String,
}

/// A status as sent by clients: its name or its numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
    /// Numeric code (`1` pending, `2` approved, `3` rejected).
    Code(i64),
    /// Status name, case-insensitive.
    Name(String),
}

impl TryFrom<StatusValue> for RequestStatus {
    type Error = CheckerError;

    fn try_from(value: StatusValue) -> Result<Self, Self::Error> {
        match value {
            StatusValue::Code(code) => Self::from_code(code),
            StatusValue::Name(name) => name.parse(),
        }
    }
}

/// Body of `PATCH /messages/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveBody {
    /// Desired terminal status.
    pub status: StatusValue,
}

/// Query string of `GET /messages`.
///
/// Everything arrives as text so that malformed numbers can be treated as
/// absent instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Target filter.
    #[serde(default, alias = "receiver_id")]
    pub target_id: Option<String>,
    /// Maker filter.
    #[serde(default, alias = "sender_id")]
    pub maker_id: Option<String>,
    /// Status filter, by name or code.
    #[serde(default)]
    pub status: Option<String>,
    /// Items to skip.
    #[serde(default)]
    pub skip: Option<String>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<String>,
}

impl ListParams {
    /// Split into filter and pagination.
    ///
    /// # Errors
    ///
    /// Returns a 400 [`AppError`] if `status` is set but not a known status.
    pub fn into_parts(self) -> Result<(RequestFilter, Pagination), AppError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<RequestStatus>()?),
        };

        let filter = RequestFilter {
            target_id: self.target_id,
            maker_id: self.maker_id,
            status,
        };

        let pagination = Pagination {
            skip: lenient_int(self.skip.as_deref()),
            limit: lenient_int(self.limit.as_deref()),
        };

        Ok((filter, pagination))
    }
}

fn lenient_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}
