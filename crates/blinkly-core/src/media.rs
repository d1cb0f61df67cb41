// ── Media source seam ──
//
// Camera updates need two things from the session: turning a
// server-relative path into an absolute URL, and downloading bytes.
// Abstracting them lets the attribute updater run against a fake in
// tests without a mock server.

use std::future::Future;

use blinkly_api::BlinkClient;
use bytes::Bytes;

/// URL construction and binary download for thumbnails and clips.
pub trait MediaSource: Sync {
    /// Join a server-relative path onto the session's base URL.
    fn absolute_url(&self, path: &str) -> String;

    /// Download the resource at `url` using the session credentials.
    fn fetch_binary(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Bytes, blinkly_api::Error>> + Send;
}

impl MediaSource for BlinkClient {
    fn absolute_url(&self, path: &str) -> String {
        BlinkClient::absolute_url(self, path)
    }

    fn fetch_binary(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Bytes, blinkly_api::Error>> + Send {
        self.fetch_bytes(url)
    }
}
