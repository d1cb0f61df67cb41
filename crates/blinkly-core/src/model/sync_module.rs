// ── Sync module ──
//
// A sync module owns the cameras of one network plus the event feed and
// clip index built during the current poll cycle.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use blinkly_api::AttributeMap;

use super::camera::Camera;
use super::feed::{ClipIndex, EventFeed};
use crate::error::CoreError;
use crate::media::MediaSource;

#[derive(Debug, Clone, Serialize)]
pub struct SyncModule {
    pub network_id: i64,
    pub network_name: String,
    pub sync_id: Option<i64>,
    pub serial: Option<String>,
    pub status: Option<String>,
    pub armed: Option<bool>,
    pub last_refresh: Option<DateTime<Utc>>,
    cameras: IndexMap<String, Camera>,
    #[serde(skip)]
    feed: EventFeed,
    #[serde(skip)]
    clips: ClipIndex,
}

impl SyncModule {
    pub fn new(network_id: i64, network_name: impl Into<String>) -> Self {
        Self {
            network_id,
            network_name: network_name.into(),
            sync_id: None,
            serial: None,
            status: None,
            armed: None,
            last_refresh: None,
            cameras: IndexMap::new(),
            feed: EventFeed::default(),
            clips: ClipIndex::default(),
        }
    }

    // ── Cameras ──────────────────────────────────────────────────────

    /// Cameras in discovery order.
    pub fn cameras(&self) -> impl Iterator<Item = &Camera> {
        self.cameras.values()
    }

    pub fn camera(&self, name: &str) -> Option<&Camera> {
        self.cameras.get(name)
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    /// The camera called `name`, created empty on first sight.
    pub fn ensure_camera(&mut self, name: &str) -> &mut Camera {
        self.cameras
            .entry(name.to_owned())
            .or_insert_with(|| Camera::new(name))
    }

    /// Find the camera a status payload describes, creating it if new.
    ///
    /// Matches on `camera_id` first so a renamed camera keeps its
    /// history, then on `name`. Returns the camera's current key, or
    /// `None` when the payload carries neither field.
    pub fn camera_key_for(&mut self, payload: &AttributeMap) -> Option<String> {
        let camera_id = payload.get("camera_id").and_then(id_string);
        if let Some(id) = camera_id.as_deref() {
            if let Some(key) = self
                .cameras
                .iter()
                .find(|(_, cam)| cam.camera_id.as_deref() == Some(id))
                .map(|(key, _)| key.clone())
            {
                return Some(key);
            }
        }

        let name = payload
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .or(camera_id)?;
        if !self.cameras.contains_key(&name) {
            debug!(network = self.network_id, camera = %name, "discovered camera");
        }
        self.ensure_camera(&name);
        Some(name)
    }

    /// Apply a payload to the camera stored under `key` and refresh its
    /// media against the current clip index.
    ///
    /// A rename takes effect even when the media refresh fails.
    pub async fn update_camera<M>(
        &mut self,
        key: &str,
        payload: &AttributeMap,
        media: &M,
    ) -> Result<(), CoreError>
    where
        M: MediaSource + ?Sized,
    {
        let name = self.apply_camera(key, payload, media)?;
        self.refresh_camera_media(&name, media).await
    }

    /// Apply a payload's attributes to the camera stored under `key`.
    ///
    /// Returns the camera's key afterwards. A renamed camera is re-keyed
    /// in place; a rename onto another camera's name is refused and the
    /// camera keeps its old name.
    pub fn apply_camera<M>(
        &mut self,
        key: &str,
        payload: &AttributeMap,
        media: &M,
    ) -> Result<String, CoreError>
    where
        M: MediaSource + ?Sized,
    {
        let camera = self
            .cameras
            .get_mut(key)
            .ok_or_else(|| CoreError::CameraNotFound { name: key.to_owned() })?;
        camera.apply(payload, media);
        let new_name = camera.name.clone();
        if new_name == key {
            return Ok(new_name);
        }

        if self.cameras.contains_key(&new_name) {
            warn!(from = %key, to = %new_name, "rename collides with an existing camera");
            if let Some(camera) = self.cameras.get_mut(key) {
                camera.name = key.to_owned();
            }
            return Ok(key.to_owned());
        }
        if let Some((index, _, camera)) = self.cameras.shift_remove_full(key) {
            self.cameras.shift_insert(index, new_name.clone(), camera);
        }
        Ok(new_name)
    }

    /// Resolve the clip and download changed media for one camera.
    pub async fn refresh_camera_media<M>(&mut self, name: &str, media: &M) -> Result<(), CoreError>
    where
        M: MediaSource + ?Sized,
    {
        let camera = self
            .cameras
            .get_mut(name)
            .ok_or_else(|| CoreError::CameraNotFound { name: name.to_owned() })?;
        camera.refresh_media(&self.clips, media).await
    }

    // ── Events ───────────────────────────────────────────────────────

    pub fn feed(&self) -> &EventFeed {
        &self.feed
    }

    pub fn clips(&self) -> &ClipIndex {
        &self.clips
    }

    /// Replace the feed and clip index for the current cycle.
    pub fn set_events(&mut self, feed: EventFeed, clips: ClipIndex) {
        self.feed = feed;
        self.clips = clips;
    }

    /// Run the motion check on every camera against the current feed.
    /// Returns the names of cameras that reported motion.
    pub fn check_for_motion(&mut self) -> Vec<String> {
        let feed = &self.feed;
        let mut detected = Vec::new();
        for camera in self.cameras.values_mut() {
            camera.check_for_motion(feed);
            if camera.motion_detected() == Some(true) {
                detected.push(camera.name.clone());
            }
        }
        detected
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::Future;

    use bytes::Bytes;
    use serde_json::json;

    use super::*;

    struct NoMedia;

    impl MediaSource for NoMedia {
        fn absolute_url(&self, path: &str) -> String {
            format!("https://rest.test.immedia-semi.com{path}")
        }

        fn fetch_binary(
            &self,
            _url: &str,
        ) -> impl Future<Output = Result<Bytes, blinkly_api::Error>> + Send {
            std::future::ready(Ok(Bytes::new()))
        }
    }

    fn payload(value: serde_json::Value) -> AttributeMap {
        value.as_object().cloned().unwrap()
    }

    fn names(module: &SyncModule) -> Vec<&str> {
        module.cameras().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn discovers_cameras_by_name_then_id() {
        let mut module = SyncModule::new(5678, "Home");

        let key = module.camera_key_for(&payload(json!({ "name": "Front", "camera_id": 1 })));
        assert_eq!(key.as_deref(), Some("Front"));
        let key = module.camera_key_for(&payload(json!({ "camera_id": 2 })));
        assert_eq!(key.as_deref(), Some("2"));
        assert!(module.camera_key_for(&payload(json!({ "battery_state": "ok" }))).is_none());

        assert_eq!(names(&module), vec!["Front", "2"]);
    }

    #[tokio::test]
    async fn rename_keeps_history_and_position() {
        let mut module = SyncModule::new(5678, "Home");
        module.ensure_camera("Back");
        let key = module
            .camera_key_for(&payload(json!({ "name": "Front", "camera_id": 1 })))
            .unwrap();
        module.ensure_camera("Garage");
        module
            .update_camera(&key, &payload(json!({ "camera_id": 1 })), &NoMedia)
            .await
            .unwrap();

        module.set_events([("Front", vec![10])].into_iter().collect(), ClipIndex::new());
        module.check_for_motion();

        let renamed = payload(json!({ "name": "Porch", "camera_id": 1 }));
        let key = module.camera_key_for(&renamed).unwrap();
        assert_eq!(key, "Front");
        module.update_camera(&key, &renamed, &NoMedia).await.unwrap();

        assert_eq!(names(&module), vec!["Back", "Porch", "Garage"]);
        let porch = module.camera("Porch").unwrap();
        assert_eq!(porch.last_records().iter().copied().collect::<Vec<_>>(), vec![10]);
        assert!(module.camera("Front").is_none());
    }

    #[test]
    fn rename_onto_existing_camera_is_refused() {
        let mut module = SyncModule::new(5678, "Home");
        module.ensure_camera("Back");
        let key = module
            .camera_key_for(&payload(json!({ "name": "Front", "camera_id": 1 })))
            .unwrap();
        module.set_events([("Back", vec![3])].into_iter().collect(), ClipIndex::new());
        module.check_for_motion();

        let name = module
            .apply_camera(&key, &payload(json!({ "name": "Back", "camera_id": 1 })), &NoMedia)
            .unwrap();

        assert_eq!(name, "Front");
        assert_eq!(names(&module), vec!["Back", "Front"]);
        assert_eq!(module.camera("Front").unwrap().camera_id.as_deref(), Some("1"));
        let back = module.camera("Back").unwrap();
        assert_eq!(back.last_records().iter().copied().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn motion_check_reports_only_new_events() {
        let mut module = SyncModule::new(5678, "Home");
        module.ensure_camera("Front");
        module.ensure_camera("Back");

        module.set_events(
            [("Front", vec![1]), ("Back", vec![2])].into_iter().collect(),
            ClipIndex::new(),
        );
        assert!(module.check_for_motion().is_empty());

        module.set_events(
            [("Front", vec![1, 5]), ("Back", vec![2])].into_iter().collect(),
            ClipIndex::new(),
        );
        assert_eq!(module.check_for_motion(), vec!["Front".to_owned()]);
        assert_eq!(module.camera("Back").unwrap().motion_detected(), Some(false));
    }

    #[tokio::test]
    async fn update_unknown_camera_fails() {
        let mut module = SyncModule::new(5678, "Home");
        let err = module
            .update_camera("ghost", &AttributeMap::new(), &NoMedia)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::CameraNotFound { .. }));
    }
}
