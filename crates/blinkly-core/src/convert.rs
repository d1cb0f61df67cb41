// ── API-to-domain conversions ──
//
// Bridges raw `blinkly_api` responses into the domain model: the video
// listing becomes the per-cycle event feed and clip index, network
// payloads become `Network`, and sync module details land on the module.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::trace;

use blinkly_api::{
    AttributeMap, Homescreen, NetworkEntry, NetworkSummary, SyncModuleEntry, VideoEntry,
};

use crate::model::{ClipIndex, EventFeed, EventId, Network, SyncModule};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a clip creation time into an event identifier (epoch seconds).
///
/// Accepts RFC 3339 and the zone-less form some firmware sends, which is
/// read as UTC.
pub fn parse_event_id(created_at: &str) -> Option<EventId> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(created_at) {
        return Some(dt.with_timezone(&Utc).timestamp());
    }
    NaiveDateTime::parse_from_str(created_at, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc().timestamp())
}

/// The network a video belongs to, when the listing says so.
fn video_network(video: &VideoEntry) -> Option<i64> {
    match video.extra.get("network_id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

// ── Videos ─────────────────────────────────────────────────────────

/// Build the event feed and clip index for one network.
///
/// Videos tagged with another network are skipped; untagged videos are
/// kept. Entries with an unparseable creation time are dropped.
pub fn events_from_videos(videos: &[VideoEntry], network_id: i64) -> (EventFeed, ClipIndex) {
    let mut feed = EventFeed::new();
    let mut clips = ClipIndex::new();

    for video in videos {
        if video_network(video).is_some_and(|id| id != network_id) {
            continue;
        }
        let Some(event) = parse_event_id(&video.created_at) else {
            trace!(created_at = %video.created_at, "skipping video with unparseable date");
            continue;
        };
        feed.record(video.camera_name.as_str(), event);
        clips.insert(video.camera_name.as_str(), event, video.address.as_str());
    }

    (feed, clips)
}

// ── Homescreen ─────────────────────────────────────────────────────

/// Camera attributes from the homescreen, keyed by camera id.
///
/// The homescreen carries the thumbnail path and a few fields the status
/// listing sometimes omits.
pub fn homescreen_cameras(home: &Homescreen) -> HashMap<String, AttributeMap> {
    home.devices
        .iter()
        .filter(|device| device.device_type == "camera")
        .filter_map(|device| {
            let id = device.device_id?;
            let mut attrs = device.extra.clone();
            attrs.insert("camera_id".into(), Value::from(id));
            if let Some(name) = &device.name {
                attrs.insert("name".into(), Value::from(name.as_str()));
            }
            if let Some(thumb) = &device.thumbnail {
                attrs.insert("thumbnail".into(), Value::from(thumb.as_str()));
            }
            Some((id.to_string(), attrs))
        })
        .collect()
}

/// Copy keys from `fallback` that `payload` does not already have.
pub fn merge_missing(payload: &mut AttributeMap, fallback: &AttributeMap) {
    for (key, value) in fallback {
        if !payload.contains_key(key) {
            payload.insert(key.clone(), value.clone());
        }
    }
}

// ── Networks ───────────────────────────────────────────────────────

/// Networks from the login payload, which keys them by id string.
pub fn networks_from_login<'a>(
    networks: impl IntoIterator<Item = (&'a String, &'a NetworkSummary)>,
) -> Vec<Network> {
    networks
        .into_iter()
        .filter_map(|(id, summary)| {
            let id = id.parse().ok()?;
            Some(Network {
                id,
                name: summary.name.clone(),
                armed: None,
                onboarded: summary.onboarded,
            })
        })
        .collect()
}

impl From<NetworkEntry> for Network {
    fn from(entry: NetworkEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            armed: Some(entry.armed),
            onboarded: true,
        }
    }
}

// ── Sync module ────────────────────────────────────────────────────

pub fn apply_sync_module(module: &mut SyncModule, entry: &SyncModuleEntry) {
    module.sync_id = Some(entry.id);
    module.serial.clone_from(&entry.serial);
    module.status.clone_from(&entry.status);
}
