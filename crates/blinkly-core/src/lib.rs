// blinkly-core: Camera domain model, motion tracking and polling between
// blinkly-api and the CLI.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod media;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, TlsVerification};
pub use controller::{ConnectionState, Controller};
pub use error::CoreError;
pub use media::MediaSource;

pub use model::{
    AttributeKey, Camera, ClipIndex, EventFeed, EventId, MAX_CLIPS, MotionEvent, Network,
    SyncModule,
};
