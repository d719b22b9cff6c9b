// Tenant settings endpoints

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::Setting;
use crate::odata::{ODataList, ODataQuery};

const SETTINGS: &str = "odata/Settings";

#[derive(Debug, Clone, Copy)]
pub struct Settings<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn settings(&self) -> Settings<'_> {
        Settings { client: self }
    }
}

impl Settings<'_> {
    /// `GET odata/Settings`
    pub async fn list(&self) -> Result<ODataList<Setting>, Error> {
        self.client.get_list(SETTINGS, &ODataQuery::new()).await
    }

    /// `PUT odata/Settings`
    pub async fn update<B: Serialize + ?Sized>(&self, body: &B) -> Result<Option<Value>, Error> {
        debug!("updating settings");
        self.client.put(SETTINGS, body).await
    }

    /// `GET odata/Settings/FeatureFlags`
    pub async fn feature_flags(&self) -> Result<Value, Error> {
        self.client.get(&format!("{SETTINGS}/FeatureFlags")).await
    }

    /// `PUT odata/Settings/FeatureFlags`
    pub async fn update_feature_flags<B: Serialize + ?Sized>(
        &self,
        flags: &B,
    ) -> Result<Option<Value>, Error> {
        debug!("updating feature flags");
        self.client.put(&format!("{SETTINGS}/FeatureFlags"), flags).await
    }

    /// `GET odata/Settings/License`
    pub async fn license(&self) -> Result<Value, Error> {
        self.client.get(&format!("{SETTINGS}/License")).await
    }

    /// `GET odata/Settings/Authentication`
    pub async fn authentication(&self) -> Result<Value, Error> {
        self.client.get(&format!("{SETTINGS}/Authentication")).await
    }

    /// `PUT odata/Settings/Authentication`
    pub async fn update_authentication<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<Option<Value>, Error> {
        debug!("updating authentication settings");
        self.client.put(&format!("{SETTINGS}/Authentication"), body).await
    }
}
