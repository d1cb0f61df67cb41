// ── Networks and motion events ──

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::feed::EventId;

/// A Blink network (one per sync module in practice).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Network {
    pub id: i64,
    pub name: String,
    pub armed: Option<bool>,
    pub onboarded: bool,
}

/// Emitted when a camera's motion check reports a new event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MotionEvent {
    pub network_id: i64,
    pub camera: String,
    pub event: Option<EventId>,
    pub detected_at: DateTime<Utc>,
}
