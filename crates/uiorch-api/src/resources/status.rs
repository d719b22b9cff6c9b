// Service status endpoints

use serde_json::Value;

use super::require;
use crate::client::OrchestratorClient;
use crate::error::Error;

#[derive(Debug, Clone, Copy)]
pub struct Status<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn status(&self) -> Status<'_> {
        Status { client: self }
    }
}

impl Status<'_> {
    /// Whether this Orchestrator node should be serving traffic.
    ///
    /// Returns the response body if one is sent; a bare 200 yields `None`.
    ///
    /// `GET api/Status/Get`
    pub async fn get(&self) -> Result<Option<Value>, Error> {
        self.client.get_optional("api/Status/Get", &[]).await
    }

    /// Ask Orchestrator whether it can reach `url`.
    ///
    /// `GET api/Status/VerifyHostAvailibility` (the endpoint name is misspelled upstream)
    pub async fn verify_host_availability(&self, url: &str) -> Result<Value, Error> {
        require("url", url)?;
        self.client
            .get_with_params(
                "api/Status/VerifyHostAvailibility",
                &[("url", url.to_owned())],
            )
            .await
    }
}
