// Library feed endpoints

use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use super::require;
use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::Package;
use crate::odata::{self, ODataList, ODataQuery};

const LIBRARIES: &str = "odata/Libraries";
const ACTIONS: &str = "odata/Libraries/UiPath.Server.Configuration.OData";

#[derive(Debug, Clone, Copy)]
pub struct Libraries<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn libraries(&self) -> Libraries<'_> {
        Libraries { client: self }
    }
}

impl Libraries<'_> {
    /// `GET odata/Libraries`
    pub async fn list(&self, query: &ODataQuery) -> Result<ODataList<Package>, Error> {
        debug!("listing libraries");
        self.client.get_list(LIBRARIES, query).await
    }

    /// `GET odata/Libraries/UiPath.Server.Configuration.OData.GetVersions(packageId='…')`
    pub async fn versions(&self, package_id: &str) -> Result<ODataList<Package>, Error> {
        require("package_id", package_id)?;
        let path = format!("{ACTIONS}.GetVersions(packageId={})", odata::literal(package_id));
        self.client.get(&path).await
    }

    /// `POST odata/Libraries/UiPath.Server.Configuration.OData.UploadPackage` (multipart)
    pub async fn upload(&self, file_name: &str, bytes: Bytes) -> Result<Value, Error> {
        debug!(file_name, size = bytes.len(), "uploading library");
        self.client
            .upload(&format!("{ACTIONS}.UploadPackage"), file_name, bytes)
            .await
    }

    /// `GET odata/Libraries/UiPath.Server.Configuration.OData.DownloadPackage(key='…')`
    pub async fn download(&self, key: &str) -> Result<Bytes, Error> {
        require("key", key)?;
        let path = format!("{ACTIONS}.DownloadPackage(key={})", odata::literal(key));
        self.client.get_bytes(&path, &[]).await
    }

    /// `DELETE odata/Libraries('{key}')`
    pub async fn delete(&self, key: &str) -> Result<(), Error> {
        require("key", key)?;
        debug!(key, "deleting library");
        self.client
            .delete(&format!("{LIBRARIES}({})", odata::literal(key)))
            .await
    }
}
