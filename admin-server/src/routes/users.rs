//! User management endpoints.
//!
//! Any signed-in user may read the directory; only admins may change it.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use studio_common::{NewUser, Role, UserPatch, UserRecord, UserStatus};

use crate::auth::{ensure_admin, SessionUser};
use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::AppState;

/// User as shown by the dashboard. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Avatar initials derived from the name
    pub initials: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl From<UserRecord> for UserSummary {
    fn from(user: UserRecord) -> Self {
        Self {
            initials: user.initials(),
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
            created_at: user.created_at,
            last_seen_at: user.last_seen_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// GET /admin/api/users
async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<UsersResponse>> {
    let users: Vec<UserSummary> = state
        .directory
        .list()
        .await?
        .into_iter()
        .map(UserSummary::from)
        .collect();

    Ok(Json(UsersResponse {
        total: users.len(),
        users,
    }))
}

/// GET /admin/api/users/:id
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserSummary>> {
    let user = state.directory.get(&id).await?;
    Ok(Json(user.into()))
}

/// POST /admin/api/users
async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionUser>,
    JsonBody(new_user): JsonBody<NewUser>,
) -> ApiResult<(StatusCode, Json<UserSummary>)> {
    ensure_admin(&session)?;

    let user = state.directory.create(new_user).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PATCH /admin/api/users/:id
async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionUser>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<UserPatch>,
) -> ApiResult<Json<UserSummary>> {
    ensure_admin(&session)?;

    let user = state.directory.update(&id, patch).await?;
    Ok(Json(user.into()))
}

/// DELETE /admin/api/users/:id
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    ensure_admin(&session)?;

    let deleted = state.directory.delete(&id).await?;
    Ok(Json(DeleteResponse { deleted }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}
