#![allow(clippy::unwrap_used)]
// End-to-end poll cycle tests for `Controller` against a wiremock server.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use blinkly_core::{ClientConfig, ConnectionState, Controller, CoreError};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        login_url: Url::parse(&server.uri()).unwrap(),
        email: "foo@example.com".into(),
        password: SecretString::from("deadbeef".to_string()),
        refresh_interval_secs: 0,
        ..ClientConfig::default()
    }
}

async fn mount_json(server: &MockServer, verb: &str, route: &str, body: serde_json::Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_account(server: &MockServer) {
    mount_json(
        server,
        "POST",
        "/login",
        json!({
            "authtoken": { "authtoken": "abc123", "message": "auth" },
            "networks": {
                "5678": { "name": "Home", "onboarded": true },
                "9999": { "name": "Cabin", "onboarded": false }
            },
            "region": { "test": "Test" }
        }),
    )
    .await;
    mount_json(
        server,
        "GET",
        "/homescreen",
        json!({
            "devices": [
                { "device_type": "camera", "device_id": 1234, "name": "Front",
                  "thumbnail": "/thumb/front" }
            ]
        }),
    )
    .await;
    mount_json(
        server,
        "GET",
        "/networks",
        json!({ "networks": [{ "id": 5678, "name": "Home", "armed": true }] }),
    )
    .await;
    mount_json(
        server,
        "GET",
        "/network/5678/syncmodules",
        json!({
            "syncmodule": { "id": 42, "network_id": 5678, "serial": "SM-1", "status": "online" }
        }),
    )
    .await;
    mount_json(
        server,
        "GET",
        "/network/5678/cameras",
        json!({
            "devicestatus": [
                { "camera_id": 1234, "name": "Front", "battery_voltage": 90, "temperature": 68 }
            ]
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/thumb/front.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn mount_videos(server: &MockServer, videos: serde_json::Value) {
    mount_json(server, "GET", "/api/v2/videos/page/0", videos).await;
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn connect_runs_first_cycle() {
    let server = MockServer::start().await;
    mount_account(&server).await;
    mount_videos(
        &server,
        json!([
            { "camera_name": "Front", "address": "/clip/1.mp4",
              "created_at": "2024-01-01T00:00:01+00:00" }
        ]),
    )
    .await;

    let controller = Controller::new(config(&server));
    tokio_test::assert_ok!(controller.connect().await);
    assert_eq!(*controller.connection_state().borrow(), ConnectionState::Connected);

    let modules = controller.modules_snapshot();
    assert_eq!(modules.len(), 1, "only onboarded networks are tracked");
    assert_eq!(modules[0].sync_id, Some(42));
    assert_eq!(modules[0].armed, Some(true));

    let front = controller.camera("Front").unwrap();
    assert_eq!(front.camera_id.as_deref(), Some("1234"));
    assert_eq!(front.battery, Some(50));
    assert_eq!(front.temperature_c, Some(20.0));
    assert_eq!(
        front.thumbnail.as_deref(),
        Some(format!("{}/thumb/front.jpg", server.uri()).as_str())
    );
    assert_eq!(front.image_from_cache.as_deref(), Some(&b"jpeg"[..]));
    // First sighting seeds the history without reporting motion.
    assert_eq!(front.motion_detected(), Some(false));
    assert_eq!(front.last_records().len(), 1);

    controller.disconnect().await;
    assert_eq!(
        *controller.connection_state().borrow(),
        ConnectionState::Disconnected
    );
}

#[tokio::test]
async fn new_clip_reports_motion() {
    let server = MockServer::start().await;
    mount_account(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/videos/page/0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "camera_name": "Front", "address": "/clip/1.mp4",
              "created_at": "2024-01-01T00:00:01+00:00" }
        ])))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_videos(
        &server,
        json!([
            { "camera_name": "Front", "address": "/clip/2.mp4",
              "created_at": "2024-01-01T00:05:00+00:00" },
            { "camera_name": "Front", "address": "/clip/1.mp4",
              "created_at": "2024-01-01T00:00:01+00:00" }
        ]),
    )
    .await;

    let controller = Controller::new(config(&server));
    controller.connect().await.unwrap();
    let mut motion = controller.motion_events();

    controller.full_refresh().await.unwrap();

    let event = motion.try_recv().unwrap();
    assert_eq!(event.camera, "Front");
    assert_eq!(event.network_id, 5678);
    assert_eq!(event.event, Some(1_704_067_500));

    let front = controller.camera("Front").unwrap();
    assert_eq!(front.motion_detected(), Some(true));
    assert_eq!(front.last_records().len(), 2);

    controller.disconnect().await;
}

#[tokio::test]
async fn clip_follows_newest_event_in_same_cycle() {
    let server = MockServer::start().await;
    mount_account(&server).await;
    for (route, body) in [
        ("/clip/1.mp4", b"first".to_vec()),
        ("/clip/2.mp4", b"second".to_vec()),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/v2/videos/page/0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "camera_name": "Front", "address": "/clip/1.mp4",
              "created_at": "2024-01-01T00:00:01+00:00" }
        ])))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_videos(
        &server,
        json!([
            { "camera_name": "Front", "address": "/clip/2.mp4",
              "created_at": "2024-01-01T00:05:00+00:00" },
            { "camera_name": "Front", "address": "/clip/1.mp4",
              "created_at": "2024-01-01T00:00:01+00:00" }
        ]),
    )
    .await;

    let controller = Controller::new(config(&server));
    controller.connect().await.unwrap();

    let front = controller.camera("Front").unwrap();
    assert_eq!(
        front.clip.as_deref(),
        Some(format!("{}/clip/1.mp4", server.uri()).as_str())
    );
    assert_eq!(front.video_from_cache.as_deref(), Some(&b"first"[..]));

    controller.full_refresh().await.unwrap();

    let front = controller.camera("Front").unwrap();
    assert_eq!(front.motion_detected(), Some(true));
    assert_eq!(
        front.clip.as_deref(),
        Some(format!("{}/clip/2.mp4", server.uri()).as_str())
    );
    assert_eq!(front.video_from_cache.as_deref(), Some(&b"second"[..]));

    controller.disconnect().await;
}

#[tokio::test]
async fn unknown_network_fails_connect() {
    let server = MockServer::start().await;
    mount_account(&server).await;
    mount_videos(&server, json!([])).await;

    let mut cfg = config(&server);
    cfg.network = Some("Garage".into());
    let controller = Controller::new(cfg);

    let err = controller.connect().await.unwrap_err();
    assert!(matches!(err, CoreError::NetworkNotFound { .. }));
    assert_eq!(*controller.connection_state().borrow(), ConnectionState::Failed);
}

#[tokio::test]
async fn oneshot_runs_commands() {
    let server = MockServer::start().await;
    mount_account(&server).await;
    mount_videos(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/network/5678/disarm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/network/5678/camera/1234/thumbnail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 8 })))
        .expect(1)
        .mount(&server)
        .await;

    let changed = Controller::oneshot(config(&server), |ctrl| async move {
        ctrl.snap_picture("Front").await?;
        ctrl.set_armed(Some("home"), false).await
    })
    .await
    .unwrap();

    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].armed, Some(false));
}

#[tokio::test]
async fn commands_on_unknown_camera_fail() {
    let server = MockServer::start().await;
    mount_account(&server).await;
    mount_videos(&server, json!([])).await;

    let result = Controller::oneshot(config(&server), |ctrl| async move {
        ctrl.set_motion_detection("Garage", true).await
    })
    .await;

    assert!(matches!(result, Err(CoreError::CameraNotFound { .. })));
}
