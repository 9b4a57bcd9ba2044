//! Request and identity types.
//!
//! A [`Request`] is the unit of work a maker submits and a checker resolves.
//! An [`Identity`] is the authenticated caller of one operation; it is never
//! persisted by the core.

use crate::error::CheckerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Opaque request identifier, assigned by the request store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new random `RequestId`.
    ///
    /// Stores that do not have their own id scheme use this.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Request Status
// ═══════════════════════════════════════════════════════════════════════

/// Lifecycle status of a request.
///
/// ```text
/// Pending ──► Approved
///    │
///    └──────► Rejected
/// ```
///
/// `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted and awaiting a checker.
    Pending,
    /// Accepted by a checker.
    Approved,
    /// Rejected by a checker.
    Rejected,
}

impl RequestStatus {
    /// Status name as used in JSON and query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Numeric code used by the legacy wire format and persisted by
    /// relational stores.
    #[must_use]
    pub const fn code(&self) -> i16 {
        match self {
            Self::Pending => 1,
            Self::Approved => 2,
            Self::Rejected => 3,
        }
    }

    /// Parse a numeric status code.
    ///
    /// # Errors
    ///
    /// Returns [`CheckerError::ValidationFailed`] for unknown codes.
    pub fn from_code(code: i64) -> Result<Self, CheckerError> {
        match code {
            1 => Ok(Self::Pending),
            2 => Ok(Self::Approved),
            3 => Ok(Self::Rejected),
            other => Err(CheckerError::ValidationFailed(format!(
                "unknown status code {other}"
            ))),
        }
    }

    /// Returns `true` for statuses a request can never leave.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = CheckerError;

    /// Accepts a status name (case-insensitive) or its numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return Self::from_code(code);
        }
        match trimmed.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CheckerError::ValidationFailed(format!(
                "unknown status {s:?}"
            ))),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Core State Types
// ═══════════════════════════════════════════════════════════════════════

/// A maker's request awaiting, or having received, a checker's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Store-assigned identifier.
    pub id: RequestId,

    /// Identity id of the submitter, taken from the authenticated caller.
    pub maker_id: String,

    /// Identity id of the intended checker.
    pub target_id: String,

    /// Opaque request content.
    pub payload: String,

    /// Current lifecycle status.
    pub status: RequestStatus,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Reserved for soft deletion; no lifecycle operation sets it.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A request that has not been persisted yet.
///
/// Handed to [`RequestStore::create`](crate::providers::RequestStore::create),
/// which assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    /// Identity id of the submitter.
    pub maker_id: String,

    /// Identity id of the intended checker.
    pub target_id: String,

    /// Opaque request content.
    pub payload: String,

    /// Initial status (always `Pending` through the lifecycle engine).
    pub status: RequestStatus,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewRequest {
    /// Attach a store-assigned id.
    #[must_use]
    pub fn into_request(self, id: RequestId) -> Request {
        Request {
            id,
            maker_id: self.maker_id,
            target_id: self.target_id,
            payload: self.payload,
            status: self.status,
            created_at: self.created_at,
            deleted_at: None,
        }
    }
}

/// Authenticated caller of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Stable identity id; stamped as `maker_id` on submitted requests.
    pub id: String,

    /// Human-readable name.
    pub display_name: String,

    /// Contact address (typically email).
    pub contact: String,
}

impl Identity {
    /// Create a new identity.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            contact: contact.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generation() {
        let id1 = RequestId::generate();
        let id2 = RequestId::generate();

        assert_ne!(id1, id2);
    }

    #[test]
    fn test_status_parse_names_and_codes() {
        assert_eq!("approved".parse::<RequestStatus>(), Ok(RequestStatus::Approved));
        assert_eq!("Rejected".parse::<RequestStatus>(), Ok(RequestStatus::Rejected));
        assert_eq!("1".parse::<RequestStatus>(), Ok(RequestStatus::Pending));
        assert_eq!("2".parse::<RequestStatus>(), Ok(RequestStatus::Approved));
        assert_eq!("3".parse::<RequestStatus>(), Ok(RequestStatus::Rejected));
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert!(matches!(
            "accepted".parse::<RequestStatus>(),
            Err(CheckerError::ValidationFailed(_))
        ));
        assert!(matches!(
            "7".parse::<RequestStatus>(),
            Err(CheckerError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_status_codes_round_trip() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Approved,
            RequestStatus::Rejected,
        ] {
            assert_eq!(RequestStatus::from_code(i64::from(status.code())), Ok(status));
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_status_json_uses_names() {
        let json = serde_json::to_string(&RequestStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }
}
