pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod routes;
pub mod test_util;

pub use auth::{SessionKeys, SessionUser};
pub use config::Config;
pub use error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::{middleware, Router};
use studio_directory::{EventCalendar, UserDirectory};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// User directory (remote or local backend, fixed at startup)
    pub directory: Arc<UserDirectory>,
    /// Dashboard event calendar
    pub calendar: Arc<EventCalendar>,
    /// Session token signer/validator
    pub sessions: SessionKeys,
}

impl AppState {
    pub fn new(config: Config, directory: Arc<UserDirectory>, calendar: Arc<EventCalendar>) -> Self {
        let sessions = SessionKeys::new(&config.session.secret, config.session.ttl_minutes);
        Self {
            config,
            directory,
            calendar,
            sessions,
        }
    }
}

/// Build the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::health::router(state.clone()))
        .nest("/auth", routes::auth::router(state.clone()))
        .nest("/admin/api", routes::admin_router(state))
        .layer(middleware::from_fn(logging::request_logger))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
