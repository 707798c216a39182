use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Local;
use serde::Serialize;
use studio_common::EventKind;
use studio_directory::DirectoryStats;

use crate::error::ApiResult;
use crate::AppState;

/// Dashboard overview counters.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub users: DirectoryStats,
    pub events_today: usize,
    pub project_events: usize,
}

/// GET /admin/api/stats
async fn stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatsResponse>> {
    let users = state.directory.stats().await?;
    let now = Local::now().naive_local();

    Ok(Json(StatsResponse {
        users,
        events_today: state.calendar.today(now).await.len(),
        project_events: state.calendar.count_by_kind(EventKind::Project).await,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(stats))
}
