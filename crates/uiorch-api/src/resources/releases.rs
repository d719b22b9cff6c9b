// Release endpoints
//
// A release binds a package version to a folder; jobs are started against
// a release key.

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::require;
use crate::client::{DEFAULT_PAGE_SIZE, OrchestratorClient};
use crate::error::Error;
use crate::models::Release;
use crate::odata::{Filter, ODataList, ODataQuery};

const RELEASES: &str = "odata/Releases";

#[derive(Debug, Clone, Copy)]
pub struct Releases<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn releases(&self) -> Releases<'_> {
        Releases { client: self }
    }
}

impl Releases<'_> {
    /// `GET odata/Releases`
    pub async fn list(&self, query: &ODataQuery) -> Result<ODataList<Release>, Error> {
        debug!("listing releases");
        self.client.get_list(RELEASES, query).await
    }

    pub async fn list_all(&self, query: &ODataQuery) -> Result<Vec<Release>, Error> {
        self.client.collect_all(RELEASES, query, DEFAULT_PAGE_SIZE).await
    }

    /// `GET odata/Releases({id})`
    pub async fn get(&self, id: i64) -> Result<Release, Error> {
        self.client.get(&format!("{RELEASES}({id})")).await
    }

    /// The release with this exact name in the current folder, if any.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Release>, Error> {
        require("name", name)?;
        let query = ODataQuery::from(Filter::new().eq_str("Name", name)).top(1);
        let page = self.list(&query).await?;
        Ok(page.into_vec().into_iter().next())
    }

    /// `POST odata/Releases`
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Release, Error> {
        debug!("creating release");
        self.client.post(RELEASES, body).await
    }

    /// `PUT odata/Releases({id})`
    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, body: &B) -> Result<(), Error> {
        debug!(id, "updating release");
        self.client.put_no_response(&format!("{RELEASES}({id})"), body).await
    }

    /// `DELETE odata/Releases({id})`
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting release");
        self.client.delete(&format!("{RELEASES}({id})")).await
    }

    /// Point the release at another version of its package.
    ///
    /// `POST odata/Releases({id})/UiPath.Server.Configuration.OData.UpdateToSpecificPackageVersion`
    pub async fn update_to_version(&self, id: i64, version: &str) -> Result<(), Error> {
        require("version", version)?;
        debug!(id, version, "updating release package version");
        self.client
            .post_no_response(
                &format!(
                    "{RELEASES}({id})/UiPath.Server.Configuration.OData.UpdateToSpecificPackageVersion"
                ),
                &json!({ "packageVersion": version }),
            )
            .await
    }

    /// `POST odata/Releases({id})/UiPath.Server.Configuration.OData.RollbackToPreviousReleaseVersion`
    pub async fn rollback(&self, id: i64) -> Result<(), Error> {
        debug!(id, "rolling back release");
        self.client
            .post_no_response(
                &format!(
                    "{RELEASES}({id})/UiPath.Server.Configuration.OData.RollbackToPreviousReleaseVersion"
                ),
                &json!({}),
            )
            .await
    }
}
