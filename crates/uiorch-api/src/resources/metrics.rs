// System metrics endpoints
//
// Loosely typed: the metric set depends on the Orchestrator version.

use serde_json::Value;

use super::push_opt;
use crate::client::OrchestratorClient;
use crate::error::Error;

#[derive(Debug, Clone, Copy)]
pub struct Metrics<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn metrics(&self) -> Metrics<'_> {
        Metrics { client: self }
    }
}

impl Metrics<'_> {
    /// `GET api/Metrics`
    pub async fn get(
        &self,
        category: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Value, Error> {
        let mut params = Vec::new();
        push_opt(&mut params, "category", category);
        push_opt(&mut params, "from", from);
        push_opt(&mut params, "to", to);
        self.client.get_with_params("api/Metrics", &params).await
    }

    /// `GET api/Metrics/Performance`
    pub async fn performance(&self) -> Result<Value, Error> {
        self.client.get("api/Metrics/Performance").await
    }

    /// `GET api/Metrics/Resources`
    pub async fn resources(&self) -> Result<Value, Error> {
        self.client.get("api/Metrics/Resources").await
    }
}
