//! Event calendar endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use studio_common::{CalendarEvent, NewEvent};
use studio_directory::UPCOMING_LIMIT;

use crate::auth::SessionUser;
use crate::error::ApiResult;
use crate::extract::{JsonBody, QueryParams};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<CalendarEvent>,
    pub total: usize,
}

impl From<Vec<CalendarEvent>> for EventsResponse {
    fn from(events: Vec<CalendarEvent>) -> Self {
        Self {
            total: events.len(),
            events,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// Day to show (YYYY-MM-DD). All events when absent.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    #[serde(default = "default_upcoming_limit")]
    pub limit: usize,
}

fn default_upcoming_limit() -> usize {
    UPCOMING_LIMIT
}

/// GET /admin/api/events?date=YYYY-MM-DD
async fn list_events(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<DateQuery>,
) -> Json<EventsResponse> {
    let events = match query.date {
        Some(date) => state.calendar.for_date(date).await,
        None => state.calendar.all().await,
    };
    Json(events.into())
}

/// GET /admin/api/events/today
async fn today_events(State(state): State<Arc<AppState>>) -> Json<EventsResponse> {
    let now = Local::now().naive_local();
    Json(state.calendar.today(now).await.into())
}

/// GET /admin/api/events/upcoming?limit=N
async fn upcoming_events(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<UpcomingQuery>,
) -> Json<EventsResponse> {
    let now = Local::now().naive_local();
    Json(state.calendar.upcoming(now, query.limit).await.into())
}

/// POST /admin/api/events
async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionUser>,
    JsonBody(event): JsonBody<NewEvent>,
) -> ApiResult<(StatusCode, Json<CalendarEvent>)> {
    let event = state.calendar.add(event).await?;
    tracing::debug!("Event {} created by {}", event.id, session.email);
    Ok((StatusCode::CREATED, Json(event)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/today", get(today_events))
        .route("/events/upcoming", get(upcoming_events))
}
