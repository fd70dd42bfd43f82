//! Keep-alive HTTP server.
//!
//! Serves `/` with a static liveness body for external uptime monitors,
//! and `/metrics` for Prometheus scraping. Runs on a separate tokio task.

use axum::{routing::get, Router};
use std::net::SocketAddr;

/// Handler for GET / - static liveness body for uptime monitors.
async fn keep_alive_handler() -> &'static str {
    "✅ Bot is running!"
}

/// Handler for GET /metrics - returns Prometheus metrics in text format.
async fn metrics_handler() -> String {
    crate::metrics::gather_metrics()
}

/// Run the keep-alive HTTP server.
///
/// Binds to `0.0.0.0:port`. This is a long-running task that should be
/// spawned in the background; bind or serve failures are logged, never
/// fatal to the bot.
pub async fn run_http_server(port: u16) {
    let app = Router::new()
        .route("/", get(keep_alive_handler))
        .route("/metrics", get(metrics_handler));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Keep-alive HTTP server listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind HTTP server on {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("HTTP server error: {}", e);
    }
}
