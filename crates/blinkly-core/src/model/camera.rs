// ── Camera ──
//
// One physical camera: descriptive attributes from the server, cached
// media, and a bounded history of recently seen motion events.

use std::collections::VecDeque;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, trace};

use blinkly_api::AttributeMap;

use super::attributes::apply_attributes;
use super::feed::{ClipIndex, EventFeed, EventId};
use crate::error::CoreError;
use crate::media::MediaSource;

/// Most motion events remembered per camera.
pub const MAX_CLIPS: usize = 5;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Camera {
    pub name: String,
    pub camera_id: Option<String>,
    pub network_id: Option<String>,
    pub serial: Option<String>,
    pub motion_enabled: Option<bool>,
    pub motion_alert: Option<bool>,
    /// Charge in percent, derived from `battery_voltage`.
    pub battery: Option<u8>,
    pub battery_voltage: Option<f64>,
    pub battery_state: Option<String>,
    /// Fahrenheit, as reported.
    pub temperature: Option<f64>,
    pub temperature_c: Option<f64>,
    pub wifi_strength: Option<i64>,
    /// Absolute thumbnail URL.
    pub thumbnail: Option<String>,
    /// Absolute URL of the clip for the newest remembered event.
    pub clip: Option<String>,
    #[serde(skip)]
    pub image_from_cache: Option<Bytes>,
    #[serde(skip)]
    pub video_from_cache: Option<Bytes>,
    pub updated_at: Option<DateTime<Utc>>,

    last_records: VecDeque<EventId>,
    motion_detected: Option<bool>,
    #[serde(skip)]
    image_source: Option<String>,
    #[serde(skip)]
    video_source: Option<String>,
}

impl Camera {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Remembered event identifiers, oldest first.
    pub fn last_records(&self) -> &VecDeque<EventId> {
        &self.last_records
    }

    /// Result of the most recent motion check; `None` before the first.
    pub fn motion_detected(&self) -> Option<bool> {
        self.motion_detected
    }

    pub fn newest_record(&self) -> Option<EventId> {
        self.last_records.back().copied()
    }

    // ── Motion tracking ──────────────────────────────────────────────

    /// Compare this cycle's feed against the remembered history.
    ///
    /// The greatest identifier reported for this camera is the candidate.
    /// A candidate already in the history means nothing new. Otherwise it
    /// is appended, evicting the oldest entry past [`MAX_CLIPS`], and
    /// motion is reported unless the history was empty before (cold
    /// start). A missing or empty feed entry means no new events.
    pub fn check_for_motion(&mut self, feed: &EventFeed) {
        let Some(candidate) = feed
            .events_for(&self.name)
            .and_then(|events| events.iter().copied().max())
        else {
            debug!(camera = %self.name, "no events reported this cycle");
            self.motion_detected = Some(false);
            return;
        };

        if self.last_records.contains(&candidate) {
            trace!(camera = %self.name, event = candidate, "event already seen");
            self.motion_detected = Some(false);
            return;
        }

        let cold_start = self.last_records.is_empty();
        self.last_records.push_back(candidate);
        while self.last_records.len() > MAX_CLIPS {
            self.last_records.pop_front();
        }

        if cold_start {
            debug!(camera = %self.name, event = candidate, "seeded motion history");
        } else {
            debug!(camera = %self.name, event = candidate, "motion detected");
        }
        self.motion_detected = Some(!cold_start);
    }

    // ── Attribute refresh ────────────────────────────────────────────

    /// Apply a server payload, resolve the clip for the newest event and
    /// refresh cached media.
    ///
    /// Attributes are applied before any download, so a media failure
    /// leaves the descriptive fields current.
    pub async fn update<M>(
        &mut self,
        payload: &AttributeMap,
        clips: &ClipIndex,
        media: &M,
    ) -> Result<(), CoreError>
    where
        M: MediaSource + ?Sized,
    {
        self.apply(payload, media);
        self.refresh_media(clips, media).await
    }

    /// Apply a server payload to the descriptive fields. No I/O.
    pub fn apply<M>(&mut self, payload: &AttributeMap, media: &M)
    where
        M: MediaSource + ?Sized,
    {
        apply_attributes(self, payload, &|path: &str| media.absolute_url(path));
        self.updated_at = Some(Utc::now());
    }

    /// Point `clip` at the newest remembered event and download whatever
    /// media changed since the cached copy was taken, thumbnail first.
    pub async fn refresh_media<M>(&mut self, clips: &ClipIndex, media: &M) -> Result<(), CoreError>
    where
        M: MediaSource + ?Sized,
    {
        if let Some(path) = self
            .newest_record()
            .and_then(|event| clips.clip_path(&self.name, event))
        {
            self.clip = Some(media.absolute_url(path));
        }

        if let Some(url) = self.thumbnail.clone() {
            refresh_blob(&mut self.image_from_cache, &mut self.image_source, &url, media).await?;
        }
        if let Some(url) = self.clip.clone() {
            refresh_blob(&mut self.video_from_cache, &mut self.video_source, &url, media).await?;
        }
        Ok(())
    }
}

async fn refresh_blob<M: MediaSource + ?Sized>(
    cache: &mut Option<Bytes>,
    source: &mut Option<String>,
    url: &str,
    media: &M,
) -> Result<(), CoreError> {
    if cache.is_some() && source.as_deref() == Some(url) {
        return Ok(());
    }
    *cache = Some(fetch(media, url).await?);
    *source = Some(url.to_owned());
    Ok(())
}

async fn fetch<M: MediaSource + ?Sized>(media: &M, url: &str) -> Result<Bytes, CoreError> {
    media
        .fetch_binary(url)
        .await
        .map_err(|source| CoreError::MediaFetch {
            url: url.to_owned(),
            source,
        })
}
