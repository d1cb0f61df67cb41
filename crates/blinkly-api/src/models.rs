// Blink REST response types
//
// The vendor API is undocumented and varies between account generations.
// Fields use `#[serde(default)]` liberally; anything not modelled lands in
// a flattened `extra` map so callers can still reach it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flat camera attribute payload, exactly as the server sent it.
pub type AttributeMap = Map<String, Value>;

// ── Login ────────────────────────────────────────────────────────────

/// Response from `POST /login`.
///
/// ```json
/// {
///   "authtoken": { "authtoken": "abc", "message": "auth" },
///   "networks": { "5678": { "name": "Home", "onboarded": true } },
///   "region": { "prde": "Europe" }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub authtoken: AuthToken,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkSummary>,
    /// Region id → human-readable region name. Only one entry in practice.
    #[serde(default)]
    pub region: BTreeMap<String, String>,
}

impl LoginResponse {
    /// The region identifier used to build the regional REST host.
    pub fn region_id(&self) -> Option<&str> {
        self.region.keys().next().map(String::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub authtoken: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Network entry from the login payload, keyed by network id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub name: String,
    #[serde(default)]
    pub onboarded: bool,
}

// ── Networks ─────────────────────────────────────────────────────────

/// Response from `GET /networks`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworksResponse {
    #[serde(default)]
    pub networks: Vec<NetworkEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub armed: bool,
    #[serde(default)]
    pub time_zone: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Homescreen ───────────────────────────────────────────────────────

/// Response from `GET /homescreen`: account-wide device summary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Homescreen {
    #[serde(default)]
    pub network: Option<HomescreenNetwork>,
    #[serde(default)]
    pub devices: Vec<HomescreenDevice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HomescreenNetwork {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub armed: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub wifi_strength: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One device on the homescreen. `device_type` is `"camera"` or
/// `"sync_module"` on every firmware seen so far.
#[derive(Debug, Clone, Deserialize)]
pub struct HomescreenDevice {
    pub device_type: String,
    #[serde(default)]
    pub device_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Sync module ──────────────────────────────────────────────────────

/// Response from `GET /network/{id}/syncmodules`.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncModuleResponse {
    pub syncmodule: SyncModuleEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncModuleEntry {
    pub id: i64,
    pub network_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub fw_version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Cameras ──────────────────────────────────────────────────────────

/// Response from `GET /network/{id}/cameras`: one flat attribute map
/// per camera.
#[derive(Debug, Clone, Deserialize)]
pub struct CameraStatusResponse {
    #[serde(default)]
    pub devicestatus: Vec<AttributeMap>,
}

/// Response from `GET /network/{id}/camera/{camera}/config`.
#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfigResponse {
    #[serde(default)]
    pub camera: Vec<AttributeMap>,
}

// ── Videos ───────────────────────────────────────────────────────────

/// One recorded clip from `GET /api/v2/videos/page/{n}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoEntry {
    #[serde(default)]
    pub id: Option<i64>,
    pub camera_name: String,
    /// Server-relative path of the `.mp4` clip.
    pub address: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// ISO-8601 creation time, e.g. `2018-02-11T13:55:58+00:00`.
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Commands ─────────────────────────────────────────────────────────

/// Acknowledgement returned by command endpoints (arm, disarm, snap, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub network_id: Option<i64>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub state_condition: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_response_exposes_region() {
        let raw = json!({
            "authtoken": { "authtoken": "abc", "message": "auth" },
            "networks": { "5678": { "name": "Home", "onboarded": true } },
            "region": { "prde": "Europe" }
        });
        let resp: LoginResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.authtoken.authtoken, "abc");
        assert_eq!(resp.region_id(), Some("prde"));
        assert!(resp.networks["5678"].onboarded);
    }

    #[test]
    fn video_entry_keeps_unknown_fields() {
        let raw = json!({
            "camera_name": "Front",
            "address": "/api/v2/accounts/1/media/clip.mp4",
            "created_at": "2018-02-11T13:55:58+00:00",
            "watched": false
        });
        let video: VideoEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(video.camera_name, "Front");
        assert_eq!(video.extra.get("watched"), Some(&json!(false)));
    }

    #[test]
    fn homescreen_tolerates_missing_sections() {
        let home: Homescreen = serde_json::from_value(json!({})).unwrap();
        assert!(home.network.is_none());
        assert!(home.devices.is_empty());
    }
}
