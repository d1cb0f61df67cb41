// Camera endpoints
//
// Status and configuration reads return flat attribute maps; the
// command endpoints toggle motion detection and request a new thumbnail.

use tracing::debug;

use crate::client::BlinkClient;
use crate::error::Error;
use crate::models::{AttributeMap, CameraConfigResponse, CameraStatusResponse, CommandResponse};

impl BlinkClient {
    /// Status payloads for every camera on a network.
    ///
    /// `GET /network/{network_id}/cameras`
    pub async fn list_camera_status(&self, network_id: i64) -> Result<Vec<AttributeMap>, Error> {
        let url = self.api_url(&format!("/network/{network_id}/cameras"))?;
        debug!(network_id, "listing camera status");
        let resp: CameraStatusResponse = self.get_json(url).await?;
        Ok(resp.devicestatus)
    }

    /// Detailed configuration of a single camera.
    ///
    /// `GET /network/{network_id}/camera/{camera_id}/config`
    ///
    /// Returns `None` if the server sent an empty `camera` array.
    pub async fn get_camera_config(
        &self,
        network_id: i64,
        camera_id: &str,
    ) -> Result<Option<AttributeMap>, Error> {
        let url = self.api_url(&format!("/network/{network_id}/camera/{camera_id}/config"))?;
        debug!(network_id, camera_id, "fetching camera config");
        let resp: CameraConfigResponse = self.get_json(url).await?;
        Ok(resp.camera.into_iter().next())
    }

    /// Turn motion detection on or off for one camera.
    ///
    /// `POST /network/{network_id}/camera/{camera_id}/enable` or `.../disable`
    pub async fn set_motion_detection(
        &self,
        network_id: i64,
        camera_id: &str,
        enable: bool,
    ) -> Result<CommandResponse, Error> {
        let action = if enable { "enable" } else { "disable" };
        let url = self.api_url(&format!(
            "/network/{network_id}/camera/{camera_id}/{action}"
        ))?;
        debug!(network_id, camera_id, action, "toggling motion detection");
        self.post_json(url, None).await
    }

    /// Ask the camera to take a new thumbnail picture.
    ///
    /// `POST /network/{network_id}/camera/{camera_id}/thumbnail`
    pub async fn snap_picture(
        &self,
        network_id: i64,
        camera_id: &str,
    ) -> Result<CommandResponse, Error> {
        let url = self.api_url(&format!(
            "/network/{network_id}/camera/{camera_id}/thumbnail"
        ))?;
        debug!(network_id, camera_id, "requesting new thumbnail");
        self.post_json(url, None).await
    }
}
