//! Server runtime: wiring, metrics endpoint and graceful shutdown.

use crate::config::ServerConfig;
use crate::router::build_router;
use crate::state::AppState;
use anyhow::Context as _;
use maker_checker_core::environment::{Clock, SystemClock};
use maker_checker_core::{
    AuthorizationGate, JwtIdentityProvider, RequestLifecycle, RequestStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Build application state over `store` with a JWT identity provider.
#[must_use]
pub fn build_state<S: RequestStore>(
    config: &ServerConfig,
    store: S,
) -> AppState<S, JwtIdentityProvider> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let credentials = config.credential_config();
    let resolve_timeout = credentials.resolve_timeout;

    let lifecycle = RequestLifecycle::new(store, Arc::clone(&clock), config.lifecycle_config());
    let gate = AuthorizationGate::new(JwtIdentityProvider::new(credentials, clock))
        .with_timeout(resolve_timeout);

    AppState::new(lifecycle, gate)
}

/// Serve the API over `store` until a shutdown signal arrives.
///
/// When `metrics` is set, a Prometheus scrape endpoint is served on
/// `METRICS_PORT` alongside the API.
///
/// # Errors
///
/// Returns error if a listener cannot bind or a server fails.
pub async fn run<S>(
    config: ServerConfig,
    store: S,
    metrics: Option<PrometheusHandle>,
) -> anyhow::Result<()>
where
    S: RequestStore + 'static,
{
    let shutdown = CancellationToken::new();
    let operations = CancellationToken::new();

    let app = build_router(build_state(&config, store).with_cancellation(operations.clone()));
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, "HTTP server listening");

    let api = spawn_server(listener, app, shutdown.clone());

    let metrics_server = match (metrics, config.metrics_port) {
        (Some(handle), Some(port)) => {
            let metrics_address = format!("{}:{port}", config.host);
            let listener = tokio::net::TcpListener::bind(&metrics_address)
                .await
                .with_context(|| format!("failed to bind {metrics_address}"))?;
            info!(address = %metrics_address, "Prometheus metrics available at /metrics");

            let metrics_app = axum::Router::new().route(
                "/metrics",
                axum::routing::get(move || {
                    let handle = handle.clone();
                    async move { handle.render() }
                }),
            );
            Some(spawn_server(listener, metrics_app, shutdown.clone()))
        }
        _ => None,
    };

    shutdown_signal().await;
    info!("Shutdown signal received, draining in-flight requests");
    shutdown.cancel();

    drain("api", api, config.shutdown_timeout, &operations).await?;
    if let Some(handle) = metrics_server {
        drain("metrics", handle, config.shutdown_timeout, &operations).await?;
    }

    info!("Graceful shutdown complete");
    Ok(())
}

fn spawn_server(
    listener: tokio::net::TcpListener,
    app: axum::Router,
    shutdown: CancellationToken,
) -> JoinHandle<std::io::Result<()>> {
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
    })
}

/// Wait up to `timeout` for a server task to finish. If it does not,
/// cancel `operations` so in-flight requests fail with `Cancelled`, and wait
/// once more.
async fn drain(
    name: &'static str,
    mut handle: JoinHandle<std::io::Result<()>>,
    timeout: std::time::Duration,
    operations: &CancellationToken,
) -> anyhow::Result<()> {
    let joined = match tokio::time::timeout(timeout, &mut handle).await {
        Ok(joined) => joined,
        Err(_) => {
            warn!(server = name, ?timeout, "Shutdown timed out, cancelling in-flight operations");
            operations.cancel();
            match tokio::time::timeout(timeout, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(server = name, "In-flight requests ignored cancellation, abandoning them");
                    return Ok(());
                }
            }
        }
    };

    joined
        .with_context(|| format!("{name} server task failed"))?
        .with_context(|| format!("{name} server error"))
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed the error is logged and that signal is
/// ignored.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            pending().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                pending().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }
}

fn pending() -> impl Future<Output = ()> {
    std::future::pending::<()>()
}
