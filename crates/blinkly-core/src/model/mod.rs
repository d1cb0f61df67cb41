// Domain model: cameras, sync modules, the per-cycle event feed.

pub mod attributes;
pub mod camera;
pub mod feed;
pub mod network;
pub mod sync_module;

pub use attributes::{AttributeKey, BATTERY_FULL_SCALE, battery_percentage, fahrenheit_to_celsius};
pub use camera::{Camera, MAX_CLIPS};
pub use feed::{ClipIndex, EventFeed, EventId};
pub use network::{MotionEvent, Network};
pub use sync_module::SyncModule;
