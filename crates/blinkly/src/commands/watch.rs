//! `watch`: keep a session open and print motion events as they arrive.

use owo_colors::OwoColorize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use blinkly_core::{ClientConfig, Controller, MotionEvent};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(config: ClientConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if config.refresh_interval_secs == 0 {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "watch needs a refresh interval of at least 1 second".into(),
        });
    }
    let interval = config.refresh_interval_secs;

    let controller = Controller::new(config);
    let mut events = controller.motion_events();
    controller.connect().await?;
    info!(interval, "watching for motion");
    if !global.quiet {
        let cameras = controller.cameras_snapshot().len();
        eprintln!("Watching {cameras} camera(s), polling every {interval}s. Ctrl-C to stop.");
    }

    let color = output::should_color(&global.color);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            received = events.recv() => match received {
                Ok(event) => output::print_output(&render_event(&event, &global.output, color), global.quiet),
                Err(RecvError::Lagged(missed)) => warn!(missed, "dropped motion events"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    controller.disconnect().await;
    Ok(())
}

fn render_event(event: &MotionEvent, format: &OutputFormat, color: bool) -> String {
    match format {
        OutputFormat::Table => {
            let at = event.detected_at.format("%Y-%m-%d %H:%M:%S");
            let camera = if color {
                event.camera.bold().to_string()
            } else {
                event.camera.clone()
            };
            let id = event
                .event
                .map_or_else(String::new, |id| format!(" (event {id})"));
            format!("{at}  motion on {camera} in network {}{id}", event.network_id)
        }
        // One document per line so the stream stays parseable
        OutputFormat::Json | OutputFormat::JsonCompact => {
            output::render_single(&OutputFormat::JsonCompact, event, |_| String::new(), |_| {
                String::new()
            })
        }
        OutputFormat::Yaml => format!("---\n{}", output::render_yaml(event)),
        OutputFormat::Plain => event.camera.clone(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn event() -> MotionEvent {
        MotionEvent {
            network_id: 5678,
            camera: "Front".into(),
            event: Some(1_704_067_500),
            detected_at: Utc.timestamp_opt(1_704_067_500, 0).single().unwrap_or_default(),
        }
    }

    #[test]
    fn table_line_names_camera_and_event() {
        let line = render_event(&event(), &OutputFormat::Table, false);
        assert_eq!(
            line,
            "2024-01-01 00:05:00  motion on Front in network 5678 (event 1704067500)"
        );
    }

    #[test]
    fn json_events_are_single_line() {
        let line = render_event(&event(), &OutputFormat::Json, false);
        assert!(!line.contains('\n'));
        assert!(line.contains(r#""camera":"Front""#));
    }
}
