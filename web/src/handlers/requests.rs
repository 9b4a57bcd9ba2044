//! `/messages` handlers.
//!
//! Every handler takes a [`Caller`], so the authorization gate has run and
//! succeeded before any body is parsed or any lifecycle operation starts.

use crate::dto::{Envelope, ListParams, ResolveBody, SubmitBody};
use crate::error::AppError;
use crate::extractors::{Caller, CorrelationId};
use crate::state::AppState;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use maker_checker_core::{
    IdentityProvider, Request, RequestId, RequestStatus, RequestStore,
};

const CREATED: &str = "Message created successfully.";
const UPDATED: &str = "Message updated successfully.";
const RETRIEVED: &str = "Message retrieved successfully.";

/// Submit a request as the caller.
///
/// # Endpoint
///
/// ```text
/// POST /messages
/// { "target_id": "bob", "payload": "wire 500 EUR" }
/// ```
///
/// Responds `201` with the new request id as `data`.
///
/// # Errors
///
/// `400` for a malformed body or empty fields, `401` without a valid
/// credential, `500` if the store fails.
pub async fn submit_request<S, P>(
    State(state): State<AppState<S, P>>,
    correlation_id: CorrelationId,
    caller: Caller,
    body: Result<Json<SubmitBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<RequestId>>), AppError>
where
    S: RequestStore + 'static,
    P: IdentityProvider + 'static,
{
    let Json(body) = body?;
    tracing::debug!(correlation_id = %correlation_id.0, caller_id = %caller.identity.id, "Submit");

    let request = state
        .lifecycle
        .submit_request(&caller.identity, &body.target_id, &body.payload, &caller.cancel)
        .await?;

    Ok((StatusCode::CREATED, Json(Envelope::new(request.id, CREATED))))
}

/// Resolve a pending request.
///
/// # Endpoint
///
/// ```text
/// PATCH /messages/{id}
/// { "status": "approved" }
/// ```
///
/// `status` may also be a numeric code (`2` approved, `3` rejected).
///
/// # Errors
///
/// `400` for an unknown or non-terminal status, `403` when the resolve
/// policy refuses the caller, `404` for an unknown id, `409` when the
/// request is no longer pending or a concurrent resolve won.
pub async fn resolve_request<S, P>(
    State(state): State<AppState<S, P>>,
    correlation_id: CorrelationId,
    caller: Caller,
    Path(id): Path<String>,
    body: Result<Json<ResolveBody>, JsonRejection>,
) -> Result<Json<Envelope<RequestId>>, AppError>
where
    S: RequestStore + 'static,
    P: IdentityProvider + 'static,
{
    let Json(body) = body?;
    let desired = RequestStatus::try_from(body.status)?;
    tracing::debug!(correlation_id = %correlation_id.0, request_id = %id, %desired, "Resolve");

    let request = state
        .lifecycle
        .resolve_request(&caller.identity, &RequestId::from(id), desired, &caller.cancel)
        .await?;

    Ok(Json(Envelope::new(request.id, UPDATED)))
}

/// Fetch one request.
///
/// # Endpoint
///
/// ```text
/// GET /messages/{id}
/// ```
///
/// # Errors
///
/// `404` for an unknown id.
pub async fn get_request<S, P>(
    State(state): State<AppState<S, P>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Request>>, AppError>
where
    S: RequestStore + 'static,
    P: IdentityProvider + 'static,
{
    let request = state
        .lifecycle
        .get_request(&caller.identity, &RequestId::from(id), &caller.cancel)
        .await?;

    Ok(Json(Envelope::new(request, RETRIEVED)))
}

/// List requests.
///
/// # Endpoint
///
/// ```text
/// GET /messages?target_id=bob&maker_id=alice&status=approved&skip=0&limit=30
/// ```
///
/// `receiver_id` and `sender_id` are accepted for `target_id` and
/// `maker_id`. A target filter without a status lists approved requests
/// only. Unparseable `skip`/`limit` values are ignored.
///
/// # Errors
///
/// `400` for an unknown status or a malformed query string.
pub async fn list_requests<S, P>(
    State(state): State<AppState<S, P>>,
    caller: Caller,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Request>>>, AppError>
where
    S: RequestStore + 'static,
    P: IdentityProvider + 'static,
{
    let Query(params) = params?;
    let (filter, pagination) = params.into_parts()?;

    let requests = state
        .lifecycle
        .list_requests(&caller.identity, filter, pagination, &caller.cancel)
        .await?;

    Ok(Json(Envelope::new(requests, RETRIEVED)))
}
