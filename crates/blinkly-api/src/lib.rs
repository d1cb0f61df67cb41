// blinkly-api: Async Rust client for the Blink camera cloud REST API

pub mod auth;
pub mod camera;
pub mod client;
pub mod error;
pub mod models;
pub mod network;
pub mod transport;
pub mod videos;

pub use auth::{DEFAULT_LOGIN_URL, regional_base_url};
pub use client::BlinkClient;
pub use error::Error;
pub use models::{
    AttributeMap, CommandResponse, Homescreen, HomescreenDevice, LoginResponse, NetworkEntry,
    NetworkSummary, SyncModuleEntry, VideoEntry,
};
pub use transport::{TlsMode, TransportConfig};
