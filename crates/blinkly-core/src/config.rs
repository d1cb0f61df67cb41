// ── Runtime session configuration ──
//
// Describes how to reach the Blink cloud and which account to use.
// Carries credentials and tuning but never touches disk; the CLI builds
// a `ClientConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Only useful against a local mock server.
    DangerAcceptInvalid,
}

/// Everything the controller needs to open a session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Login host; the session moves to the regional host after login.
    pub login_url: Url,
    pub email: String,
    pub password: SecretString,
    /// Restrict to one network, by id or name. `None` means all onboarded.
    pub network: Option<String>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Seconds between background poll cycles. 0 = never.
    pub refresh_interval_secs: u64,
    /// Pages of the video listing read per cycle.
    pub video_pages: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            login_url: Url::parse(blinkly_api::DEFAULT_LOGIN_URL)
                .expect("default login URL is valid"),
            email: String::new(),
            password: SecretString::from(String::new()),
            network: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            refresh_interval_secs: 30,
            video_pages: 1,
        }
    }
}
