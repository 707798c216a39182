use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::users::UserSummary;
use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// POST /auth/login - Exchange email and password for a session token.
async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest("email and password are required".to_string()));
    }

    let user = state
        .directory
        .authenticate(&request.email, &request.password)
        .await?;

    let token = state.sessions.issue(&user).map_err(|e| {
        tracing::error!("Failed to issue session for {}: {}", user.id, e);
        ApiError::Internal(e.to_string())
    })?;

    tracing::info!("User {} signed in as {}", user.email, user.role);

    Ok(Json(LoginResponse {
        token,
        user: UserSummary::from(user),
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login))
        .with_state(state)
}
