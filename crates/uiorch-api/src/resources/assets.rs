// Asset endpoints
//
// Assets are folder-scoped named values (text, bool, integer, credential).
// Robots read their per-robot value through `GetRobotAssetByNameForRobotKey`.

use serde::Serialize;
use tracing::debug;

use super::require;
use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::{Asset, NewAsset, RobotAsset};
use crate::odata::{self, Filter, ODataList, ODataQuery};

const ASSETS: &str = "odata/Assets";

#[derive(Debug, Clone, Copy)]
pub struct Assets<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn assets(&self) -> Assets<'_> {
        Assets { client: self }
    }
}

impl Assets<'_> {
    /// `GET odata/Assets`
    pub async fn list(&self, query: &ODataQuery) -> Result<ODataList<Asset>, Error> {
        debug!("listing assets");
        self.client.get_list(ASSETS, query).await
    }

    /// `GET odata/Assets({id})`
    pub async fn get(&self, id: i64) -> Result<Asset, Error> {
        self.client.get(&format!("{ASSETS}({id})")).await
    }

    /// Look an asset up by its exact name. `None` if no asset matches.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Asset>, Error> {
        require("name", name)?;
        let query = ODataQuery::from(Filter::new().eq_str("Name", name)).top(1);
        let page: ODataList<Asset> = self.client.get_list(ASSETS, &query).await?;
        Ok(page.into_vec().into_iter().next())
    }

    /// `POST odata/Assets`
    pub async fn create(&self, asset: &NewAsset) -> Result<Asset, Error> {
        require("name", &asset.name)?;
        debug!(name = %asset.name, value_type = %asset.value_type, "creating asset");
        self.client.post(ASSETS, asset).await
    }

    /// Replace an asset. The body must carry the asset's `Id`.
    ///
    /// `PUT odata/Assets({id})`
    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, body: &B) -> Result<(), Error> {
        debug!(id, "updating asset");
        self.client.put_no_response(&format!("{ASSETS}({id})"), body).await
    }

    /// `DELETE odata/Assets({id})`
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting asset");
        self.client.delete(&format!("{ASSETS}({id})")).await
    }

    /// Resolve an asset's value as seen by one robot, including credential passwords.
    ///
    /// `GET odata/Assets/UiPath.Server.Configuration.OData.GetRobotAssetByNameForRobotKey(robotKey='…',assetName='…')`
    pub async fn get_robot_asset(&self, robot_key: &str, name: &str) -> Result<RobotAsset, Error> {
        require("robot_key", robot_key)?;
        require("name", name)?;
        debug!(robot_key, name, "fetching robot asset");
        let path = format!(
            "{ASSETS}/UiPath.Server.Configuration.OData.GetRobotAssetByNameForRobotKey(robotKey={},assetName={})",
            odata::literal(robot_key),
            odata::literal(name),
        );
        self.client.get(&path).await
    }
}
