//! Admin API routes.
//!
//! Provides:
//! - Health check (`/health`)
//! - Login (`/auth/login`)
//! - User management (`/admin/api/users`)
//! - Event calendar (`/admin/api/events`)
//! - Overview counters (`/admin/api/stats`)

pub mod auth;
pub mod events;
pub mod health;
pub mod stats;
pub mod users;

use std::sync::Arc;

use axum::{middleware, Router};

use crate::auth::require_session;
use crate::AppState;

/// Routes under `/admin/api`; every one needs a session token.
pub fn admin_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(users::router())
        .merge(events::router())
        .merge(stats::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_session))
        .with_state(state)
}
