//! Error types for the maker-checker workflow.

use crate::state::{RequestId, RequestStatus};
use thiserror::Error;

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, CheckerError>;

/// Error taxonomy for the request lifecycle, the authorization gate and the
/// collaborators they call.
///
/// Every variant carries enough context to build a human-readable message,
/// and [`CheckerError::kind`] gives the machine-checkable category.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckerError {
    // ═══════════════════════════════════════════════════════════
    // Caller Errors
    // ═══════════════════════════════════════════════════════════

    /// Input was malformed; the caller can correct it and retry.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Credential missing, invalid or expired.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Caller is authenticated but not permitted to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // ═══════════════════════════════════════════════════════════
    // Lifecycle Errors
    // ═══════════════════════════════════════════════════════════

    /// No request exists with the given id.
    #[error("Request {0} not found")]
    NotFound(RequestId),

    /// Resolve attempted on a request that is no longer pending.
    #[error("Request {id} is {status}, only pending requests can be resolved")]
    InvalidTransition {
        /// Request that was targeted
        id: RequestId,
        /// Status the request was found in
        status: RequestStatus,
    },

    /// A concurrent resolve won the compare-and-swap.
    #[error("Request {0} was resolved concurrently")]
    Conflict(RequestId),

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// The request store failed; wraps the underlying cause.
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// The operation was aborted by caller cancellation or timeout.
    #[error("Operation cancelled: {0}")]
    Cancelled(String),
}

/// Machine-checkable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`CheckerError::ValidationFailed`].
    ValidationFailed,
    /// See [`CheckerError::Unauthenticated`].
    Unauthenticated,
    /// See [`CheckerError::Forbidden`].
    Forbidden,
    /// See [`CheckerError::NotFound`].
    NotFound,
    /// See [`CheckerError::InvalidTransition`].
    InvalidTransition,
    /// See [`CheckerError::Conflict`].
    Conflict,
    /// See [`CheckerError::StorageFailure`].
    StorageFailure,
    /// See [`CheckerError::Cancelled`].
    Cancelled,
}

impl ErrorKind {
    /// Stable code for clients and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::Conflict => "CONFLICT",
            Self::StorageFailure => "STORAGE_FAILURE",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CheckerError {
    /// The category of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// # use maker_checker_core::{CheckerError, ErrorKind};
    /// let err = CheckerError::ValidationFailed("payload is empty".to_string());
    /// assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    /// assert_eq!(err.kind().as_str(), "VALIDATION_FAILED");
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::StorageFailure(_) => ErrorKind::StorageFailure,
            Self::Cancelled(_) => ErrorKind::Cancelled,
        }
    }

    /// Returns `true` if this error is caused by the caller rather than the
    /// system.
    ///
    /// # Examples
    ///
    /// ```
    /// # use maker_checker_core::CheckerError;
    /// assert!(CheckerError::Forbidden("not the target".to_string()).is_user_error());
    /// assert!(!CheckerError::StorageFailure("connection reset".to_string()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed(_)
                | Self::Unauthenticated(_)
                | Self::Forbidden(_)
                | Self::NotFound(_)
                | Self::InvalidTransition { .. }
        )
    }

    /// Returns `true` if the operation lost a race or was interrupted and may
    /// succeed if the caller tries again.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Conflict(_) | Self::Cancelled(_) | Self::StorageFailure(_)
        )
    }
}
