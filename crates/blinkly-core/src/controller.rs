// ── Controller ──
//
// Session lifecycle for one Blink account: login, network selection,
// the poll cycle that drives motion tracking and attribute refresh, and
// the commands the CLI issues against cameras and networks.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use blinkly_api::transport::{TlsMode, TransportConfig};
use blinkly_api::{AttributeMap, BlinkClient, Homescreen, NetworkEntry, VideoEntry};

use crate::config::{ClientConfig, TlsVerification};
use crate::convert;
use crate::error::CoreError;
use crate::model::{Camera, MotionEvent, Network, SyncModule};

const MOTION_CHANNEL_SIZE: usize = 64;

// ── ConnectionState ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Controller ───────────────────────────────────────────────────

/// Entry point for consumers.
///
/// Cheaply cloneable. All sync modules sit behind one async mutex that
/// is held for a whole poll cycle, so a cycle and a command never
/// interleave. Readers use the published snapshots instead.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ClientConfig,
    connection_state: watch::Sender<ConnectionState>,
    modules_tx: watch::Sender<Arc<Vec<SyncModule>>>,
    networks_tx: watch::Sender<Arc<Vec<Network>>>,
    motion_tx: broadcast::Sender<MotionEvent>,
    cancel: CancellationToken,
    client: Mutex<Option<Arc<BlinkClient>>>,
    modules: Mutex<IndexMap<i64, SyncModule>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Create a controller. Does not connect; call [`connect()`](Self::connect).
    pub fn new(config: ClientConfig) -> Self {
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (modules_tx, _) = watch::channel(Arc::new(Vec::new()));
        let (networks_tx, _) = watch::channel(Arc::new(Vec::new()));
        let (motion_tx, _) = broadcast::channel(MOTION_CHANNEL_SIZE);

        Self {
            inner: Arc::new(ControllerInner {
                config,
                connection_state,
                modules_tx,
                networks_tx,
                motion_tx,
                cancel: CancellationToken::new(),
                client: Mutex::new(None),
                modules: Mutex::new(IndexMap::new()),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Log in, discover networks, run the first poll cycle, and start
    /// the background refresh if an interval is configured.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.inner
            .connection_state
            .send_replace(ConnectionState::Connecting);

        if let Err(e) = self.establish().await {
            self.inner.connection_state.send_replace(ConnectionState::Failed);
            return Err(e);
        }

        let interval_secs = self.inner.config.refresh_interval_secs;
        if interval_secs > 0 {
            let ctrl = self.clone();
            let cancel = self.inner.cancel.clone();
            self.inner
                .task_handles
                .lock()
                .await
                .push(tokio::spawn(refresh_task(ctrl, interval_secs, cancel)));
        }

        self.inner
            .connection_state
            .send_replace(ConnectionState::Connected);
        info!("connected to Blink");
        Ok(())
    }

    async fn establish(&self) -> Result<(), CoreError> {
        let config = &self.inner.config;
        let client = BlinkClient::new(config.login_url.clone(), &build_transport(config))?;

        let login = client.login(&config.email, &config.password).await?;
        debug!(region = ?login.region_id(), "session established");

        let known = convert::networks_from_login(&login.networks);
        let selected = select_networks(&known, config.network.as_deref())?;
        {
            let mut modules = self.inner.modules.lock().await;
            modules.clear();
            for network in selected {
                modules.insert(network.id, SyncModule::new(network.id, network.name.clone()));
            }
        }
        self.inner.networks_tx.send_replace(Arc::new(known));
        *self.inner.client.lock().await = Some(Arc::new(client));

        self.full_refresh().await
    }

    /// Stop background tasks, log out, and reset to `Disconnected`.
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        if let Some(client) = self.inner.client.lock().await.take() {
            if let Err(e) = client.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }

        self.inner
            .connection_state
            .send_replace(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Connect, run `f`, disconnect. No background refresh.
    pub async fn oneshot<F, Fut, T>(config: ClientConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.refresh_interval_secs = 0;

        let controller = Controller::new(cfg);
        controller.connect().await?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }

    // ── Poll cycle ───────────────────────────────────────────────

    /// Run one poll cycle over every selected network.
    ///
    /// Per network: refresh sync module details, apply the camera status
    /// payloads (merged with the homescreen), rebuild the event feed from
    /// the video listing, then run each camera's motion check. A failed
    /// media download is logged and does not abort the cycle.
    pub async fn full_refresh(&self) -> Result<(), CoreError> {
        let client = self.client().await?;

        let home = client.get_homescreen().await?;
        let networks = client.list_networks().await?;
        let videos = client.list_videos(self.inner.config.video_pages).await?;
        let cycle = Cycle {
            home: &home,
            networks: &networks,
            videos: &videos,
        };

        let mut modules = self.inner.modules.lock().await;
        let mut motion = Vec::new();
        for module in modules.values_mut() {
            motion.extend(refresh_module(&client, module, &cycle).await?);
        }
        self.publish(&modules);
        drop(modules);

        self.inner
            .networks_tx
            .send_replace(Arc::new(networks.into_iter().map(Network::from).collect()));

        for event in motion {
            let _ = self.inner.motion_tx.send(event);
        }
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Arm or disarm one network, or every selected network.
    pub async fn set_armed(
        &self,
        network: Option<&str>,
        armed: bool,
    ) -> Result<Vec<Network>, CoreError> {
        let client = self.client().await?;
        let mut modules = self.inner.modules.lock().await;

        let targets: Vec<i64> = match network {
            Some(wanted) => {
                let id = modules
                    .values()
                    .find(|m| network_matches(m.network_id, &m.network_name, wanted))
                    .map(|m| m.network_id)
                    .ok_or_else(|| CoreError::NetworkNotFound {
                        identifier: wanted.to_owned(),
                    })?;
                vec![id]
            }
            None => modules.keys().copied().collect(),
        };

        let mut changed = Vec::with_capacity(targets.len());
        for id in targets {
            if armed {
                client.arm_network(id).await?;
            } else {
                client.disarm_network(id).await?;
            }
            if let Some(module) = modules.get_mut(&id) {
                module.armed = Some(armed);
                changed.push(Network {
                    id,
                    name: module.network_name.clone(),
                    armed: Some(armed),
                    onboarded: true,
                });
            }
            info!(network = id, armed, "network arm state changed");
        }
        self.publish(&modules);
        Ok(changed)
    }

    /// Turn motion detection on or off for one camera.
    pub async fn set_motion_detection(&self, camera: &str, enable: bool) -> Result<(), CoreError> {
        let client = self.client().await?;
        let mut modules = self.inner.modules.lock().await;
        let (network_id, camera_id) = locate(&modules, camera)?;

        client
            .set_motion_detection(network_id, &camera_id, enable)
            .await?;
        if let Some(module) = modules.get_mut(&network_id) {
            module.ensure_camera(camera).motion_enabled = Some(enable);
        }
        self.publish(&modules);
        Ok(())
    }

    /// Ask a camera to take a new thumbnail.
    pub async fn snap_picture(&self, camera: &str) -> Result<(), CoreError> {
        let client = self.client().await?;
        let modules = self.inner.modules.lock().await;
        let (network_id, camera_id) = locate(&modules, camera)?;
        drop(modules);

        client.snap_picture(network_id, &camera_id).await?;
        Ok(())
    }

    /// Fetch a camera's detailed configuration, apply it, and return the
    /// updated camera.
    pub async fn refresh_camera_config(&self, camera: &str) -> Result<Camera, CoreError> {
        let client = self.client().await?;
        let mut modules = self.inner.modules.lock().await;
        let (network_id, camera_id) = locate(&modules, camera)?;

        let config: AttributeMap = client
            .get_camera_config(network_id, &camera_id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "camera config".into(),
                identifier: camera.to_owned(),
            })?;

        let module = modules
            .get_mut(&network_id)
            .ok_or_else(|| CoreError::Internal(format!("network {network_id} vanished")))?;
        if let Err(e) = module.update_camera(camera, &config, client.as_ref()).await {
            warn!(camera, error = %e, "camera media refresh failed");
        }
        let updated = module
            .cameras()
            .find(|c| c.camera_id.as_deref() == Some(camera_id.as_str()))
            .cloned()
            .ok_or_else(|| CoreError::CameraNotFound {
                name: camera.to_owned(),
            })?;
        self.publish(&modules);
        Ok(updated)
    }

    // ── State observation ────────────────────────────────────────

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    /// Motion events from every subsequent poll cycle.
    pub fn motion_events(&self) -> broadcast::Receiver<MotionEvent> {
        self.inner.motion_tx.subscribe()
    }

    /// Sync modules as of the end of the last cycle or command.
    pub fn subscribe_modules(&self) -> watch::Receiver<Arc<Vec<SyncModule>>> {
        self.inner.modules_tx.subscribe()
    }

    // ── Snapshot accessors ───────────────────────────────────────

    pub fn modules_snapshot(&self) -> Arc<Vec<SyncModule>> {
        self.inner.modules_tx.borrow().clone()
    }

    pub fn networks_snapshot(&self) -> Arc<Vec<Network>> {
        self.inner.networks_tx.borrow().clone()
    }

    /// All cameras across networks, in discovery order.
    pub fn cameras_snapshot(&self) -> Vec<Camera> {
        self.modules_snapshot()
            .iter()
            .flat_map(SyncModule::cameras)
            .cloned()
            .collect()
    }

    pub fn camera(&self, name: &str) -> Result<Camera, CoreError> {
        self.modules_snapshot()
            .iter()
            .find_map(|m| m.camera(name).cloned())
            .ok_or_else(|| CoreError::CameraNotFound {
                name: name.to_owned(),
            })
    }

    // ── Internals ────────────────────────────────────────────────

    async fn client(&self) -> Result<Arc<BlinkClient>, CoreError> {
        self.inner
            .client
            .lock()
            .await
            .clone()
            .ok_or(CoreError::NotConnected)
    }

    fn publish(&self, modules: &IndexMap<i64, SyncModule>) {
        let snapshot: Vec<SyncModule> = modules.values().cloned().collect();
        debug!(
            networks = snapshot.len(),
            cameras = snapshot.iter().map(SyncModule::camera_count).sum::<usize>(),
            "published snapshot"
        );
        self.inner.modules_tx.send_replace(Arc::new(snapshot));
    }
}

// ── Background tasks ─────────────────────────────────────────────

async fn refresh_task(controller: Controller, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = controller.full_refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

// ── Poll cycle steps ─────────────────────────────────────────────

/// Account-wide data fetched once per cycle.
struct Cycle<'a> {
    home: &'a Homescreen,
    networks: &'a [NetworkEntry],
    videos: &'a [VideoEntry],
}

async fn refresh_module(
    client: &BlinkClient,
    module: &mut SyncModule,
    cycle: &Cycle<'_>,
) -> Result<Vec<MotionEvent>, CoreError> {
    if let Some(entry) = cycle.networks.iter().find(|n| n.id == module.network_id) {
        module.armed = Some(entry.armed);
        module.network_name.clone_from(&entry.name);
    }

    match client.get_sync_module(module.network_id).await {
        Ok(entry) => convert::apply_sync_module(module, &entry),
        Err(e) if e.is_not_found() => {
            debug!(network = module.network_id, "network has no sync module");
        }
        Err(e) => return Err(e.into()),
    }

    let (feed, clips) = convert::events_from_videos(cycle.videos, module.network_id);
    module.set_events(feed, clips);

    let home_cameras = convert::homescreen_cameras(cycle.home);
    let statuses = client.list_camera_status(module.network_id).await?;
    let mut updated = Vec::with_capacity(statuses.len());
    for mut payload in statuses {
        let home_attrs = payload
            .get("camera_id")
            .map(|id| match id {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .and_then(|id| home_cameras.get(&id));
        if let Some(attrs) = home_attrs {
            convert::merge_missing(&mut payload, attrs);
        }

        let Some(key) = module.camera_key_for(&payload) else {
            debug!("skipping camera payload without name or id");
            continue;
        };
        match module.apply_camera(&key, &payload, client) {
            Ok(name) => updated.push(name),
            Err(e) => {
                warn!(
                    network = module.network_id,
                    camera = %key,
                    error = %e,
                    "camera update failed"
                );
            }
        }
    }

    let now = Utc::now();
    let motion = module
        .check_for_motion()
        .into_iter()
        .map(|camera| MotionEvent {
            network_id: module.network_id,
            event: module.camera(&camera).and_then(Camera::newest_record),
            camera,
            detected_at: now,
        })
        .collect();

    for name in &updated {
        if let Err(e) = module.refresh_camera_media(name, client).await {
            warn!(
                network = module.network_id,
                camera = %name,
                error = %e,
                "camera media refresh failed"
            );
        }
    }

    module.last_refresh = Some(now);
    Ok(motion)
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_transport(config: &ClientConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}

fn network_matches(id: i64, name: &str, wanted: &str) -> bool {
    id.to_string() == wanted || name.eq_ignore_ascii_case(wanted)
}

/// Networks to track: the one named by `filter`, else every onboarded one.
fn select_networks<'a>(
    known: &'a [Network],
    filter: Option<&str>,
) -> Result<Vec<&'a Network>, CoreError> {
    match filter {
        Some(wanted) => known
            .iter()
            .find(|n| network_matches(n.id, &n.name, wanted))
            .map(|n| vec![n])
            .ok_or_else(|| CoreError::NetworkNotFound {
                identifier: wanted.to_owned(),
            }),
        None => Ok(known.iter().filter(|n| n.onboarded).collect()),
    }
}

/// Resolve a camera name to its network and server-side id.
fn locate(modules: &IndexMap<i64, SyncModule>, camera: &str) -> Result<(i64, String), CoreError> {
    let (network_id, cam) = modules
        .values()
        .find_map(|m| m.camera(camera).map(|c| (m.network_id, c)))
        .ok_or_else(|| CoreError::CameraNotFound {
            name: camera.to_owned(),
        })?;
    let camera_id = cam.camera_id.clone().ok_or_else(|| CoreError::NotFound {
        entity_type: "camera id".into(),
        identifier: camera.to_owned(),
    })?;
    Ok((network_id, camera_id))
}
