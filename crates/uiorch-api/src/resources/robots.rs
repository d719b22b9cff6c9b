// Robot and session endpoints

use serde::Serialize;
use tracing::debug;

use super::require;
use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::{Robot, Session};
use crate::odata::{self, ODataList, ODataQuery};

const ROBOTS: &str = "odata/Robots";
const SESSIONS: &str = "odata/Sessions";

#[derive(Debug, Clone, Copy)]
pub struct Robots<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn robots(&self) -> Robots<'_> {
        Robots { client: self }
    }
}

impl Robots<'_> {
    /// `GET odata/Robots`
    pub async fn list(&self, query: &ODataQuery) -> Result<ODataList<Robot>, Error> {
        debug!("listing robots");
        self.client.get_list(ROBOTS, query).await
    }

    /// `GET odata/Robots({id})`
    pub async fn get(&self, id: i64) -> Result<Robot, Error> {
        self.client.get(&format!("{ROBOTS}({id})")).await
    }

    /// `POST odata/Robots`
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Robot, Error> {
        debug!("creating robot");
        self.client.post(ROBOTS, body).await
    }

    /// `PUT odata/Robots({id})`
    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, body: &B) -> Result<(), Error> {
        debug!(id, "updating robot");
        self.client.put_no_response(&format!("{ROBOTS}({id})"), body).await
    }

    /// `DELETE odata/Robots({id})`
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting robot");
        self.client.delete(&format!("{ROBOTS}({id})")).await
    }

    /// Robot sessions: which robots are connected and what they are doing.
    ///
    /// `GET odata/Sessions`
    pub async fn sessions(&self, query: &ODataQuery) -> Result<ODataList<Session>, Error> {
        debug!("listing sessions");
        self.client.get_list(SESSIONS, query).await
    }

    /// Robots that can run the given process.
    ///
    /// `GET odata/Robots/UiPath.Server.Configuration.OData.GetRobotsForProcess(processId='…')`
    pub async fn for_process(&self, process_id: &str) -> Result<ODataList<Robot>, Error> {
        require("process_id", process_id)?;
        let path = format!(
            "{ROBOTS}/UiPath.Server.Configuration.OData.GetRobotsForProcess(processId={})",
            odata::literal(process_id)
        );
        self.client.get(&path).await
    }
}
