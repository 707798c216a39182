//! Dashboard event calendar.

use chrono::{NaiveDate, NaiveDateTime};
use studio_common::{CalendarEvent, EventKind, NewEvent};
use tokio::sync::RwLock;

use crate::error::{Error, Result};

/// Number of upcoming events shown on the dashboard overview.
pub const UPCOMING_LIMIT: usize = 5;

/// In-memory calendar of studio events.
///
/// Held by the server state and shared by handlers; nothing is persisted.
pub struct EventCalendar {
    events: RwLock<Vec<CalendarEvent>>,
}

impl EventCalendar {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    /// Schedule an event. The title is required.
    pub async fn add(&self, event: NewEvent) -> Result<CalendarEvent> {
        let title = event.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("title is required".to_string()));
        }

        let event = CalendarEvent {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: event.description,
            date: event.date,
            time: event.time,
            kind: event.kind,
            client: event.client.filter(|c| !c.trim().is_empty()),
            priority: event.priority,
        };

        self.events.write().await.push(event.clone());
        tracing::info!("Scheduled event {} on {} at {}", event.id, event.date, event.time);
        Ok(event)
    }

    pub async fn all(&self) -> Vec<CalendarEvent> {
        self.events.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Events on the given day, ordered by time.
    pub async fn for_date(&self, date: NaiveDate) -> Vec<CalendarEvent> {
        let mut events: Vec<CalendarEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.date == date)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.time);
        events
    }

    pub async fn today(&self, now: NaiveDateTime) -> Vec<CalendarEvent> {
        self.for_date(now.date()).await
    }

    /// Events starting at or after `now`, soonest first, at most `limit`.
    pub async fn upcoming(&self, now: NaiveDateTime, limit: usize) -> Vec<CalendarEvent> {
        let mut events: Vec<CalendarEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.starts_at() >= now)
            .cloned()
            .collect();
        events.sort_by_key(CalendarEvent::starts_at);
        events.truncate(limit);
        events
    }

    pub async fn count_by_kind(&self, kind: EventKind) -> usize {
        self.events.read().await.iter().filter(|e| e.kind == kind).count()
    }
}

impl Default for EventCalendar {
    fn default() -> Self {
        Self::new()
    }
}
