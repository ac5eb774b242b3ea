//! Application builder: wires router, middleware, and state into an Axum app.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use tokio::sync::watch;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use modhub_core::error::AppError;
use modhub_core::result::AppResult;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let server = &state.config.server;
    let timeout = Duration::from_secs(server.request_timeout_seconds);
    let cors = build_cors_layer(&server.cors);

    build_router(state)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve the application until Ctrl-C or SIGTERM.
///
/// In-flight requests get `server.shutdown_grace_seconds` to finish after
/// the signal; remaining connections are dropped.
pub async fn run_server(state: AppState) -> AppResult<()> {
    let addr = state.config.server.bind_address();
    let grace = Duration::from_secs(state.config.server.shutdown_grace_seconds);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!(%addr, "ModHub server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    })
    .into_future();

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = async {
            // Resolves once the signal fired and the grace period elapsed.
            let _ = shutdown_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(grace_secs = grace.as_secs(), "Shutdown grace period elapsed, dropping connections");
        }
    }

    info!("ModHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
