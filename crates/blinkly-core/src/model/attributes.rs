// ── Camera attribute mapping ──
//
// Server payloads are flat maps of loosely typed values. Each key the
// camera understands maps to one setter; everything else is ignored.

use serde_json::Value;
use strum::{AsRefStr, EnumIter, EnumString};
use tracing::trace;

use blinkly_api::AttributeMap;

use super::camera::Camera;

/// Voltage reading the server reports for a full battery.
pub const BATTERY_FULL_SCALE: f64 = 180.0;

/// Setter applied to a camera for one recognized key.
///
/// The third argument joins a server-relative path onto the REST host.
pub type Setter = fn(&mut Camera, &Value, &dyn Fn(&str) -> String);

/// Payload keys the camera recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum AttributeKey {
    Name,
    CameraId,
    NetworkId,
    Serial,
    Enabled,
    MotionAlert,
    BatteryVoltage,
    BatteryState,
    Temperature,
    WifiStrength,
    Thumbnail,
}

impl AttributeKey {
    pub fn setter(self) -> Setter {
        match self {
            Self::Name => set_name,
            Self::CameraId => set_camera_id,
            Self::NetworkId => set_network_id,
            Self::Serial => set_serial,
            Self::Enabled => set_enabled,
            Self::MotionAlert => set_motion_alert,
            Self::BatteryVoltage => set_battery_voltage,
            Self::BatteryState => set_battery_state,
            Self::Temperature => set_temperature,
            Self::WifiStrength => set_wifi_strength,
            Self::Thumbnail => set_thumbnail,
        }
    }
}

/// Apply every recognized key in `payload` to `camera`.
///
/// Returns how many keys were recognized. A value of the wrong shape
/// leaves its field untouched.
pub fn apply_attributes(
    camera: &mut Camera,
    payload: &AttributeMap,
    absolute_url: &dyn Fn(&str) -> String,
) -> usize {
    let mut applied = 0;
    for (key, value) in payload {
        match key.parse::<AttributeKey>() {
            Ok(attr) => {
                (attr.setter())(camera, value, absolute_url);
                applied += 1;
            }
            Err(_) => trace!(key = %key, "ignoring unrecognized camera attribute"),
        }
    }
    applied
}

// ── Setters ──────────────────────────────────────────────────────────

fn set_camera_id(camera: &mut Camera, value: &Value, _: &dyn Fn(&str) -> String) {
    if let Some(v) = value_as_string(value) {
        camera.camera_id = Some(v);
    }
}

fn set_network_id(camera: &mut Camera, value: &Value, _: &dyn Fn(&str) -> String) {
    if let Some(v) = value_as_string(value) {
        camera.network_id = Some(v);
    }
}

fn set_serial(camera: &mut Camera, value: &Value, _: &dyn Fn(&str) -> String) {
    if let Some(v) = value_as_string(value) {
        camera.serial = Some(v);
    }
}

fn set_enabled(camera: &mut Camera, value: &Value, _: &dyn Fn(&str) -> String) {
    if let Some(v) = value_as_bool(value) {
        camera.motion_enabled = Some(v);
    }
}

fn set_motion_alert(camera: &mut Camera, value: &Value, _: &dyn Fn(&str) -> String) {
    if let Some(v) = value_as_bool(value) {
        camera.motion_alert = Some(v);
    }
}

fn set_battery_state(camera: &mut Camera, value: &Value, _: &dyn Fn(&str) -> String) {
    if let Some(v) = value_as_string(value) {
        camera.battery_state = Some(v);
    }
}

fn set_wifi_strength(camera: &mut Camera, value: &Value, _: &dyn Fn(&str) -> String) {
    if let Some(v) = value_as_i64(value) {
        camera.wifi_strength = Some(v);
    }
}

// Derived fields

fn set_name(camera: &mut Camera, value: &Value, _: &dyn Fn(&str) -> String) {
    match value_as_string(value) {
        Some(name) if !name.is_empty() => camera.name = name,
        _ => trace!("ignoring empty camera name"),
    }
}

fn set_battery_voltage(camera: &mut Camera, value: &Value, _: &dyn Fn(&str) -> String) {
    if let Some(voltage) = value_as_f64(value) {
        camera.battery_voltage = Some(voltage);
        camera.battery = Some(battery_percentage(voltage));
    }
}

fn set_temperature(camera: &mut Camera, value: &Value, _: &dyn Fn(&str) -> String) {
    if let Some(fahrenheit) = value_as_f64(value) {
        camera.temperature = Some(fahrenheit);
        camera.temperature_c = Some(fahrenheit_to_celsius(fahrenheit));
    }
}

fn set_thumbnail(camera: &mut Camera, value: &Value, absolute_url: &dyn Fn(&str) -> String) {
    let Some(path) = value_as_string(value).filter(|path| !path.is_empty()) else {
        return;
    };
    camera.thumbnail = Some(if path.ends_with(".jpg") {
        absolute_url(&path)
    } else {
        absolute_url(&format!("{path}.jpg"))
    });
}

// ── Conversions ──────────────────────────────────────────────────────

/// Battery charge in percent, rounded and capped at 100.
#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn battery_percentage(voltage: f64) -> u8 {
    (voltage / BATTERY_FULL_SCALE * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Fahrenheit to Celsius, rounded to one decimal.
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    ((fahrenheit - 32.0) * 5.0 / 9.0 * 10.0).round() / 10.0
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;

    fn url(path: &str) -> String {
        format!("https://rest.test.immedia-semi.com{path}")
    }

    fn payload(value: Value) -> AttributeMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn keys_parse_from_snake_case() {
        assert_eq!("camera_id".parse::<AttributeKey>().unwrap(), AttributeKey::CameraId);
        assert_eq!("wifi_strength".parse::<AttributeKey>().unwrap(), AttributeKey::WifiStrength);
        assert!("lfr_strength".parse::<AttributeKey>().is_err());
        for key in AttributeKey::iter() {
            assert_eq!(key.as_ref().parse::<AttributeKey>().unwrap(), key);
        }
    }

    #[test]
    fn battery_scale() {
        assert_eq!(battery_percentage(90.0), 50);
        assert_eq!(battery_percentage(180.0), 100);
        assert_eq!(battery_percentage(250.0), 100);
        assert_eq!(battery_percentage(0.0), 0);
    }

    #[test]
    fn celsius_rounds_to_one_decimal() {
        assert!((fahrenheit_to_celsius(68.0) - 20.0).abs() < f64::EPSILON);
        assert!((fahrenheit_to_celsius(70.0) - 21.1).abs() < 1e-9);
    }

    #[test]
    fn numeric_ids_become_strings() {
        let mut camera = Camera::new("foobar");
        apply_attributes(
            &mut camera,
            &payload(json!({ "camera_id": 1234, "network_id": 5678, "serial": "12345678" })),
            &url,
        );
        assert_eq!(camera.camera_id.as_deref(), Some("1234"));
        assert_eq!(camera.network_id.as_deref(), Some("5678"));
        assert_eq!(camera.serial.as_deref(), Some("12345678"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut camera = Camera::new("foobar");
        let applied = apply_attributes(
            &mut camera,
            &payload(json!({ "lfr_strength": 5, "battery_state": "ok", "usage_rate": true })),
            &url,
        );
        assert_eq!(applied, 1);
        assert_eq!(camera.battery_state.as_deref(), Some("ok"));
    }

    #[test]
    fn thumbnail_gets_extension_once() {
        let mut camera = Camera::new("foobar");
        apply_attributes(&mut camera, &payload(json!({ "thumbnail": "/thumb" })), &url);
        assert_eq!(
            camera.thumbnail.as_deref(),
            Some("https://rest.test.immedia-semi.com/thumb.jpg")
        );

        apply_attributes(&mut camera, &payload(json!({ "thumbnail": "/other.jpg" })), &url);
        assert_eq!(
            camera.thumbnail.as_deref(),
            Some("https://rest.test.immedia-semi.com/other.jpg")
        );
    }

    #[test]
    fn empty_name_is_ignored() {
        let mut camera = Camera::new("foobar");
        apply_attributes(&mut camera, &payload(json!({ "name": "" })), &url);
        assert_eq!(camera.name, "foobar");
    }

    #[test]
    fn flags_accept_numbers() {
        let mut camera = Camera::new("foobar");
        apply_attributes(
            &mut camera,
            &payload(json!({ "enabled": 1, "motion_alert": false })),
            &url,
        );
        assert_eq!(camera.motion_enabled, Some(true));
        assert_eq!(camera.motion_alert, Some(false));
    }

    #[test]
    fn wrong_shapes_keep_previous_values() {
        let mut camera = Camera::new("foobar");
        apply_attributes(
            &mut camera,
            &payload(json!({ "battery_voltage": 90, "temperature": 68 })),
            &url,
        );
        apply_attributes(
            &mut camera,
            &payload(json!({ "battery_voltage": [1], "temperature": null })),
            &url,
        );
        assert_eq!(camera.battery, Some(50));
        assert!((camera.temperature_c.unwrap() - 20.0).abs() < 1e-9);
    }
}
