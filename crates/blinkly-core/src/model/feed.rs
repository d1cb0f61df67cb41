// ── Per-cycle event feed ──
//
// The event feed is rebuilt from the video listing on every poll cycle
// and handed by reference to each camera's motion check. It is owned by
// the sync module, never shared globally.

use std::collections::HashMap;

use serde::Serialize;

/// Opaque, comparable identifier of one recorded motion event.
/// In practice the clip's creation time in epoch seconds.
pub type EventId = i64;

/// Camera name → event identifiers reported during the current cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventFeed {
    by_camera: HashMap<String, Vec<EventId>>,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one identifier to a camera's list.
    pub fn record(&mut self, camera: impl Into<String>, event: EventId) {
        self.by_camera.entry(camera.into()).or_default().push(event);
    }

    /// The identifiers reported for `camera`, or `None` if the feed has
    /// no entry for that name at all.
    pub fn events_for(&self, camera: &str) -> Option<&[EventId]> {
        self.by_camera.get(camera).map(Vec::as_slice)
    }

    pub fn cameras(&self) -> impl Iterator<Item = &str> {
        self.by_camera.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_camera.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_camera.len()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<EventId>)> for EventFeed {
    fn from_iter<I: IntoIterator<Item = (S, Vec<EventId>)>>(iter: I) -> Self {
        Self {
            by_camera: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Camera name → (event identifier → server-relative clip path).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClipIndex {
    by_camera: HashMap<String, HashMap<EventId, String>>,
}

impl ClipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, camera: impl Into<String>, event: EventId, path: impl Into<String>) {
        self.by_camera
            .entry(camera.into())
            .or_default()
            .insert(event, path.into());
    }

    /// Clip path recorded for `event` on `camera`.
    pub fn clip_path(&self, camera: &str, event: EventId) -> Option<&str> {
        self.by_camera
            .get(camera)
            .and_then(|clips| clips.get(&event))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_camera.is_empty()
    }
}
