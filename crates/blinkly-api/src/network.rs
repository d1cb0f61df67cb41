// Network and sync-module endpoints
//
// Account-level reads (homescreen, networks) and per-network commands
// (arm / disarm).

use tracing::debug;

use crate::client::BlinkClient;
use crate::error::Error;
use crate::models::{
    CommandResponse, Homescreen, NetworkEntry, NetworksResponse, SyncModuleEntry,
    SyncModuleResponse,
};

impl BlinkClient {
    /// Account-wide device summary.
    ///
    /// `GET /homescreen`
    pub async fn get_homescreen(&self) -> Result<Homescreen, Error> {
        let url = self.api_url("/homescreen")?;
        debug!("fetching homescreen");
        self.get_json(url).await
    }

    /// List all networks on the account.
    ///
    /// `GET /networks`
    pub async fn list_networks(&self) -> Result<Vec<NetworkEntry>, Error> {
        let url = self.api_url("/networks")?;
        debug!("listing networks");
        let resp: NetworksResponse = self.get_json(url).await?;
        Ok(resp.networks)
    }

    /// Get the sync module serving a network.
    ///
    /// `GET /network/{network_id}/syncmodules`
    pub async fn get_sync_module(&self, network_id: i64) -> Result<SyncModuleEntry, Error> {
        let url = self.api_url(&format!("/network/{network_id}/syncmodules"))?;
        debug!(network_id, "fetching sync module");
        let resp: SyncModuleResponse = self.get_json(url).await?;
        Ok(resp.syncmodule)
    }

    /// Arm a network (motion detection on for all enabled cameras).
    ///
    /// `POST /network/{network_id}/arm`
    pub async fn arm_network(&self, network_id: i64) -> Result<CommandResponse, Error> {
        let url = self.api_url(&format!("/network/{network_id}/arm"))?;
        debug!(network_id, "arming network");
        self.post_json(url, None).await
    }

    /// Disarm a network.
    ///
    /// `POST /network/{network_id}/disarm`
    pub async fn disarm_network(&self, network_id: i64) -> Result<CommandResponse, Error> {
        let url = self.api_url(&format!("/network/{network_id}/disarm"))?;
        debug!(network_id, "disarming network");
        self.post_json(url, None).await
    }
}
