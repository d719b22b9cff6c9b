// Licensing endpoints (license unit acquisition for robots)

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::OrchestratorClient;
use crate::error::Error;

#[derive(Debug, Clone, Copy)]
pub struct Licensing<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn licensing(&self) -> Licensing<'_> {
        Licensing { client: self }
    }
}

impl Licensing<'_> {
    /// `POST api/Licensing/Acquire`
    pub async fn acquire<B: Serialize + ?Sized>(&self, body: &B) -> Result<Option<Value>, Error> {
        debug!("acquiring license units");
        self.client.post_optional("api/Licensing/Acquire", body).await
    }

    /// `PUT api/Licensing/Release`
    pub async fn release<B: Serialize + ?Sized>(&self, body: &B) -> Result<Option<Value>, Error> {
        debug!("releasing license units");
        self.client.put("api/Licensing/Release", body).await
    }
}
