//! Route table.

use crate::handlers::{
    get_request, health_check, list_requests, resolve_request, submit_request,
};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{Router, routing::get};
use maker_checker_core::{IdentityProvider, RequestStore};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router.
///
/// ```text
/// GET   /health
/// POST  /messages
/// GET   /messages
/// GET   /messages/:id
/// PATCH /messages/:id
/// ```
#[must_use]
pub fn build_router<S, P>(state: AppState<S, P>) -> Router
where
    S: RequestStore + 'static,
    P: IdentityProvider + 'static,
{
    let messages = Router::new()
        .route(
            "/messages",
            get(list_requests::<S, P>).post(submit_request::<S, P>),
        )
        .route(
            "/messages/:id",
            get(get_request::<S, P>).patch(resolve_request::<S, P>),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .merge(messages)
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
