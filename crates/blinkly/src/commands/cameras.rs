//! Camera command handlers.

use tabled::Tabled;

use blinkly_core::{Camera, Controller};

use crate::cli::{CamerasArgs, CamerasCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CameraRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "Temp °C")]
    temperature: String,
    #[tabled(rename = "Motion Det.")]
    enabled: String,
    #[tabled(rename = "Motion")]
    motion: String,
}

impl CameraRow {
    fn new(c: &Camera, color: bool) -> Self {
        Self {
            name: c.name.clone(),
            id: util::or_dash(c.camera_id.as_deref()),
            network: util::or_dash(c.network_id.as_deref()),
            battery: c.battery.map_or_else(|| "-".into(), |b| format!("{b}%")),
            temperature: c
                .temperature_c
                .map_or_else(|| "-".into(), |t| format!("{t:.1}")),
            enabled: output::flag(c.motion_enabled, false),
            motion: output::flag(c.motion_detected(), color),
        }
    }
}

fn detail(c: &Camera) -> String {
    let records = c
        .last_records()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    [
        format!("Name:          {}", c.name),
        format!("ID:            {}", util::or_dash(c.camera_id.as_deref())),
        format!("Network:       {}", util::or_dash(c.network_id.as_deref())),
        format!("Serial:        {}", util::or_dash(c.serial.as_deref())),
        format!("Motion det.:   {}", output::flag(c.motion_enabled, false)),
        format!("Motion alert:  {}", output::flag(c.motion_alert, false)),
        format!("Motion:        {}", output::flag(c.motion_detected(), false)),
        format!(
            "Battery:       {} ({})",
            c.battery.map_or_else(|| "-".into(), |b| format!("{b}%")),
            util::or_dash(c.battery_state.as_deref())
        ),
        format!(
            "Temperature:   {}",
            c.temperature_c
                .map_or_else(|| "-".into(), |t| format!("{t:.1} °C"))
        ),
        format!("WiFi:          {}", util::or_dash(c.wifi_strength)),
        format!("Thumbnail:     {}", util::or_dash(c.thumbnail.as_deref())),
        format!("Clip:          {}", util::or_dash(c.clip.as_deref())),
        format!(
            "Recent events: {}",
            if records.is_empty() { "-" } else { records.as_str() }
        ),
        format!(
            "Updated:       {}",
            c.updated_at
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        ),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: CamerasArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CamerasCommand::List => {
            let cameras = controller.cameras_snapshot();
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &cameras,
                |c| CameraRow::new(c, color),
                |c| c.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CamerasCommand::Show { camera, refresh } => {
            let cam = if refresh {
                controller.refresh_camera_config(&camera).await?
            } else {
                controller.camera(&camera)?
            };
            let out = output::render_single(&global.output, &cam, detail, |c| c.name.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CamerasCommand::Thumbnail { camera, out } => {
            let cam = controller.camera(&camera)?;
            let bytes = cam.image_from_cache.ok_or_else(|| CliError::NoMedia {
                camera: camera.clone(),
                media: "thumbnail".into(),
            })?;
            util::write_media(&out, &bytes)?;
            if !global.quiet {
                eprintln!("Saved {camera} thumbnail to {}", out.display());
            }
            Ok(())
        }

        CamerasCommand::Clip { camera, out } => {
            let cam = controller.camera(&camera)?;
            let bytes = cam.video_from_cache.ok_or_else(|| CliError::NoMedia {
                camera: camera.clone(),
                media: "clip".into(),
            })?;
            util::write_media(&out, &bytes)?;
            if !global.quiet {
                eprintln!("Saved {camera} clip to {}", out.display());
            }
            Ok(())
        }

        CamerasCommand::Snap { camera } => {
            controller.snap_picture(&camera).await?;
            if !global.quiet {
                eprintln!("Requested a new thumbnail from {camera}");
            }
            Ok(())
        }

        CamerasCommand::Motion { camera, state } => {
            controller
                .set_motion_detection(&camera, state.enabled())
                .await?;
            if !global.quiet {
                let word = if state.enabled() { "enabled" } else { "disabled" };
                eprintln!("Motion detection {word} on {camera}");
            }
            Ok(())
        }
    }
}
