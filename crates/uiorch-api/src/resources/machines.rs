// Machine endpoints

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::Machine;
use crate::odata::{ODataList, ODataQuery};

const MACHINES: &str = "odata/Machines";

#[derive(Debug, Clone, Copy)]
pub struct Machines<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn machines(&self) -> Machines<'_> {
        Machines { client: self }
    }
}

impl Machines<'_> {
    /// `GET odata/Machines`
    pub async fn list(&self, query: &ODataQuery) -> Result<ODataList<Machine>, Error> {
        debug!("listing machines");
        self.client.get_list(MACHINES, query).await
    }

    /// `GET odata/Machines({id})`
    pub async fn get(&self, id: i64) -> Result<Machine, Error> {
        self.client.get(&format!("{MACHINES}({id})")).await
    }

    /// `POST odata/Machines`
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Machine, Error> {
        debug!("creating machine");
        self.client.post(MACHINES, body).await
    }

    /// `PUT odata/Machines({id})`
    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, body: &B) -> Result<(), Error> {
        debug!(id, "updating machine");
        self.client.put_no_response(&format!("{MACHINES}({id})"), body).await
    }

    /// `DELETE odata/Machines({id})`
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting machine");
        self.client.delete(&format!("{MACHINES}({id})")).await
    }

    /// `POST odata/Machines/UiPath.Server.Configuration.OData.DeleteBulk`
    pub async fn delete_many(&self, ids: &[i64]) -> Result<(), Error> {
        if ids.is_empty() {
            return Err(Error::validation("machine_ids", "at least one machine id is required"));
        }
        debug!(count = ids.len(), "deleting machines");
        self.client
            .post_no_response(
                &format!("{MACHINES}/UiPath.Server.Configuration.OData.DeleteBulk"),
                &json!({ "machineIds": ids }),
            )
            .await
    }
}
