// System endpoints: liveness and server configuration.

use tracing::debug;

use crate::client::HassClient;
use crate::error::Error;
use crate::models::{ApiStatus, Config};

impl HassClient {
    /// Check that the API is up.
    ///
    /// `GET /api/` -> `{"message": "API running."}`
    pub async fn health(&self) -> Result<ApiStatus, Error> {
        debug!("checking API health");
        self.get("check API health", &[]).await
    }

    /// Fetch the server configuration snapshot.
    ///
    /// `GET /api/config`
    pub async fn get_config(&self) -> Result<Config, Error> {
        debug!("fetching config");
        self.get("get config", &["config"]).await
    }
}
