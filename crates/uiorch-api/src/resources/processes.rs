// Process endpoints
//
// Read-only view of the processes feed for code that starts or inspects
// processes rather than managing packages. Shares its paths with `packages`.

use tracing::debug;

use super::packages::{ACTIONS, PROCESSES};
use super::require;
use crate::client::{DEFAULT_PAGE_SIZE, OrchestratorClient};
use crate::error::Error;
use crate::models::{Package, PackageArguments};
use crate::odata::{self, ODataList, ODataQuery};

#[derive(Debug, Clone, Copy)]
pub struct Processes<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn processes(&self) -> Processes<'_> {
        Processes { client: self }
    }
}

impl Processes<'_> {
    /// `GET odata/Processes`
    pub async fn list(&self, query: &ODataQuery) -> Result<ODataList<Package>, Error> {
        debug!("listing processes");
        self.client.get_list(PROCESSES, query).await
    }

    pub async fn list_all(&self, query: &ODataQuery) -> Result<Vec<Package>, Error> {
        self.client
            .collect_all(PROCESSES, query, DEFAULT_PAGE_SIZE)
            .await
    }

    /// Declared arguments of the process entry point.
    pub async fn get_arguments(&self, key: &str) -> Result<PackageArguments, Error> {
        require("key", key)?;
        let path = format!("{ACTIONS}.GetArguments(key={})", odata::literal(key));
        self.client.get(&path).await
    }

    pub async fn versions(&self, process_id: &str) -> Result<ODataList<Package>, Error> {
        require("process_id", process_id)?;
        let path = format!(
            "{ACTIONS}.GetProcessVersions(processId={})",
            odata::literal(process_id)
        );
        self.client.get(&path).await
    }
}
