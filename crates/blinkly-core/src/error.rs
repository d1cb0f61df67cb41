// ── Core error types ──
//
// User-facing errors from blinkly-core. Consumers never see HTTP status
// codes or JSON parse failures directly; `From<blinkly_api::Error>`
// translates transport-layer errors into domain variants. Media fetches
// are the exception: they keep the transport error as their source.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to Blink at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not connected -- call connect() first")]
    NotConnected,

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Camera not found: {name}")]
    CameraNotFound { name: String },

    #[error("Network not found: {identifier}")]
    NetworkNotFound { identifier: String },

    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Media ────────────────────────────────────────────────────────
    /// Thumbnail or clip download failed. The transport error is kept
    /// as-is so callers can decide whether to retry just this fetch.
    #[error("Failed to fetch media from {url}")]
    MediaFetch {
        url: String,
        #[source]
        source: blinkly_api::Error,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether retrying the failed operation later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => true,
            Self::MediaFetch { source, .. } => source.is_transient(),
            Self::Api { status, .. } => matches!(status, Some(429 | 500..=599)),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<blinkly_api::Error> for CoreError {
    fn from(err: blinkly_api::Error) -> Self {
        match err {
            blinkly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            blinkly_api::Error::NotAuthenticated => CoreError::NotConnected,
            blinkly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            blinkly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            blinkly_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            blinkly_api::Error::Api { status: 404, message } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            blinkly_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            blinkly_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_translate() {
        let err = CoreError::from(blinkly_api::Error::Authentication {
            message: "bad password".into(),
        });
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }

    #[test]
    fn missing_token_means_not_connected() {
        let err = CoreError::from(blinkly_api::Error::NotAuthenticated);
        assert!(matches!(err, CoreError::NotConnected));
    }

    #[test]
    fn not_found_status_translates() {
        let err = CoreError::from(blinkly_api::Error::Api {
            status: 404,
            message: "gone".into(),
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn media_fetch_keeps_source_transience() {
        let err = CoreError::MediaFetch {
            url: "https://example.invalid/clip.mp4".into(),
            source: blinkly_api::Error::Api {
                status: 502,
                message: "bad gateway".into(),
            },
        };
        assert!(err.is_transient());
    }
}
