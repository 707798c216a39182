//! Session tokens and the middleware that guards the admin API.

mod session;

pub use session::{SessionError, SessionKeys, SessionUser};

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::AppState;

/// Middleware that requires a valid session token. The session user is made
/// available to handlers as a request extension, and echoed on the response
/// extensions for the request logger.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.sessions.authenticate(request.headers()) {
        Ok(user) => {
            request.extensions_mut().insert(user.clone());
            let mut response = next.run(request).await;
            response.extensions_mut().insert(user);
            response
        }
        Err(e) => {
            tracing::debug!("Rejected request to {}: {}", request.uri().path(), e);
            ApiError::Unauthorized.into_response()
        }
    }
}

/// Handler-side check for user-management actions.
pub fn ensure_admin(user: &SessionUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        tracing::warn!("User {} ({}) attempted an admin action", user.id, user.role);
        Err(ApiError::Forbidden)
    }
}
