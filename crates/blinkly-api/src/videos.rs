// Video listing endpoints
//
// The video listing is paged, newest first. Every entry names the camera
// that recorded it, which is how per-camera motion events are derived.

use tracing::debug;

use crate::client::BlinkClient;
use crate::error::Error;
use crate::models::VideoEntry;

impl BlinkClient {
    /// One page of recorded clips across all cameras.
    ///
    /// `GET /api/v2/videos/page/{page}`
    pub async fn list_videos_page(&self, page: u32) -> Result<Vec<VideoEntry>, Error> {
        let url = self.api_url(&format!("/api/v2/videos/page/{page}"))?;
        debug!(page, "listing videos");
        self.get_json(url).await
    }

    /// Up to `max_pages` pages of clips, stopping at the first empty page.
    pub async fn list_videos(&self, max_pages: u32) -> Result<Vec<VideoEntry>, Error> {
        let mut videos = Vec::new();
        for page in 0..max_pages {
            let batch = self.list_videos_page(page).await?;
            if batch.is_empty() {
                break;
            }
            videos.extend(batch);
        }
        Ok(videos)
    }
}
