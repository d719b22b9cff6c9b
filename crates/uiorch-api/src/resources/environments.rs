// Robot environment endpoints (classic folders)

use serde::Serialize;
use tracing::debug;

use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::Environment;
use crate::odata::{Filter, ODataList, ODataQuery};

const ENVIRONMENTS: &str = "odata/Environments";

#[derive(Debug, Clone, Copy)]
pub struct Environments<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn environments(&self) -> Environments<'_> {
        Environments { client: self }
    }
}

impl Environments<'_> {
    /// `GET odata/Environments`, optionally by name and folder.
    pub async fn list(
        &self,
        name: Option<&str>,
        folder_id: Option<i64>,
    ) -> Result<ODataList<Environment>, Error> {
        let mut filter = Filter::new().eq_str_opt("Name", name);
        if let Some(id) = folder_id {
            filter = filter.eq("OrganizationUnitId", id);
        }
        self.client
            .get_list(ENVIRONMENTS, &ODataQuery::from(filter))
            .await
    }

    /// `GET odata/Environments({id})`
    pub async fn get(&self, id: i64) -> Result<Environment, Error> {
        self.client.get(&format!("{ENVIRONMENTS}({id})")).await
    }

    /// `POST odata/Environments`
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Environment, Error> {
        debug!("creating environment");
        self.client.post(ENVIRONMENTS, body).await
    }

    /// `PUT odata/Environments({id})`
    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, body: &B) -> Result<(), Error> {
        debug!(id, "updating environment");
        self.client
            .put_no_response(&format!("{ENVIRONMENTS}({id})"), body)
            .await
    }

    /// `DELETE odata/Environments({id})`
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting environment");
        self.client.delete(&format!("{ENVIRONMENTS}({id})")).await
    }
}
