use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::SessionUser;

/// Install the global tracing subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Middleware that logs each dashboard request with the signed-in user, if any.
///
/// Server errors log at ERROR, rejected requests at WARN, health probes at DEBUG.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;
    let user = response
        .extensions()
        .get::<SessionUser>()
        .map(|u| u.id.as_str())
        .unwrap_or("-");

    if response.status().is_server_error() {
        tracing::error!(%method, %path, status, user, duration_ms, "Dashboard request failed");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, %path, status, user, duration_ms, "Dashboard request rejected");
    } else if path == "/health" {
        tracing::debug!(%method, %path, status, duration_ms, "Health check");
    } else {
        tracing::info!(%method, %path, status, user, duration_ms, "Dashboard request");
    }

    response
}
