//! Custom Axum extractors.
//!
//! - `CorrelationId`: the request correlation ID
//! - `Caller`: the authenticated caller, resolved by the authorization gate
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(caller: Caller, correlation_id: CorrelationId) -> Result<Json<Response>, AppError> {
//!     tracing::info!(
//!         correlation_id = %correlation_id.0,
//!         caller_id = %caller.identity.id,
//!         "Processing request"
//!     );
//!     Ok(Json(response))
//! }
//! ```

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use maker_checker_core::{CheckerError, Identity, IdentityProvider, RequestStore};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Taken from request extensions when the correlation middleware is
/// installed, otherwise from the `X-Correlation-ID` header, otherwise a new
/// UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(*id);
        }

        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// Authenticated caller.
///
/// Runs the [`AuthorizationGate`](maker_checker_core::AuthorizationGate) on
/// the `Authorization` header. Handlers taking a `Caller` never run for an
/// unauthenticated request; the extractor answers 401 instead.
///
/// `cancel` is a child of [`AppState::cancel`], so cancelling the state's
/// token fails this caller's operations with `Cancelled`.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Resolved identity.
    pub identity: Identity,
    /// Cancellation signal for the operations run on this caller's behalf.
    pub cancel: CancellationToken,
}

#[async_trait]
impl<S, P> FromRequestParts<AppState<S, P>> for Caller
where
    S: RequestStore + 'static,
    P: IdentityProvider + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S, P>,
    ) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                AppError::from(CheckerError::Unauthenticated(
                    "authorization header is not valid text".to_string(),
                ))
            })?),
            None => None,
        };

        let cancel = state.cancel.child_token();
        let identity = state.gate.authenticate(header, &cancel).await?;

        Ok(Self { identity, cancel })
    }
}
