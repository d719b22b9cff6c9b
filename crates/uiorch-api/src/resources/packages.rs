// Process package feed endpoints
//
// The processes feed is exposed by Orchestrator as `odata/Processes`; each
// entry is one package version. Package keys have the form `{Id}:{Version}`.

use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use super::require;
use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::{Package, PackageArguments};
use crate::odata::{self, ODataList, ODataQuery};

pub(crate) const PROCESSES: &str = "odata/Processes";
pub(crate) const ACTIONS: &str = "odata/Processes/UiPath.Server.Configuration.OData";

#[derive(Debug, Clone, Copy)]
pub struct Packages<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn packages(&self) -> Packages<'_> {
        Packages { client: self }
    }
}

impl Packages<'_> {
    /// `GET odata/Processes`
    pub async fn list(&self, query: &ODataQuery) -> Result<ODataList<Package>, Error> {
        debug!("listing packages");
        self.client.get_list(PROCESSES, query).await
    }

    /// Every published version of a package.
    ///
    /// `GET odata/Processes/UiPath.Server.Configuration.OData.GetProcessVersions(processId='…')`
    pub async fn versions(&self, package_id: &str) -> Result<ODataList<Package>, Error> {
        require("package_id", package_id)?;
        let path = format!(
            "{ACTIONS}.GetProcessVersions(processId={})",
            odata::literal(package_id)
        );
        self.client.get(&path).await
    }

    /// Upload a `.nupkg` file.
    ///
    /// `POST odata/Processes/UiPath.Server.Configuration.OData.UploadPackage` (multipart)
    pub async fn upload(&self, file_name: &str, bytes: Bytes) -> Result<Value, Error> {
        debug!(file_name, size = bytes.len(), "uploading package");
        self.client
            .upload(&format!("{ACTIONS}.UploadPackage"), file_name, bytes)
            .await
    }

    /// `GET odata/Processes/UiPath.Server.Configuration.OData.DownloadPackage(key='…')`
    pub async fn download(&self, key: &str) -> Result<Bytes, Error> {
        require("key", key)?;
        debug!(key, "downloading package");
        let path = format!("{ACTIONS}.DownloadPackage(key={})", odata::literal(key));
        self.client.get_bytes(&path, &[]).await
    }

    /// Delete one package version.
    ///
    /// `DELETE odata/Processes('{key}')`
    pub async fn delete(&self, key: &str) -> Result<(), Error> {
        require("key", key)?;
        debug!(key, "deleting package");
        self.client
            .delete(&format!("{PROCESSES}({})", odata::literal(key)))
            .await
    }

    /// `GET odata/Processes/UiPath.Server.Configuration.OData.GetArguments(key='…')`
    pub async fn arguments(&self, key: &str) -> Result<PackageArguments, Error> {
        require("key", key)?;
        let path = format!("{ACTIONS}.GetArguments(key={})", odata::literal(key));
        self.client.get(&path).await
    }
}
