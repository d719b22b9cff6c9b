// Alert endpoints

use serde_json::{Value, json};
use tracing::debug;

use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::Alert;
use crate::odata::{Filter, ODataList, ODataQuery};

const ALERTS: &str = "odata/Alerts";

#[derive(Debug, Clone, Copy)]
pub struct Alerts<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn alerts(&self) -> Alerts<'_> {
        Alerts { client: self }
    }
}

impl Alerts<'_> {
    /// Alerts, optionally narrowed by severity, status, and creation time.
    ///
    /// `from` is an ISO-8601 timestamp compared with `CreationTime gt`.
    ///
    /// `GET odata/Alerts`
    pub async fn list(
        &self,
        severity: Option<&str>,
        status: Option<&str>,
        from: Option<&str>,
    ) -> Result<ODataList<Alert>, Error> {
        let mut filter = Filter::new()
            .eq_str_opt("Severity", severity)
            .eq_str_opt("Status", status);
        if let Some(from) = from {
            filter = filter.gt("CreationTime", from);
        }
        debug!(?severity, ?status, "listing alerts");
        self.client
            .get_list(ALERTS, &ODataQuery::from(filter))
            .await
    }

    /// `GET odata/Alerts({id})`
    pub async fn get(&self, id: i64) -> Result<Alert, Error> {
        self.client.get(&format!("{ALERTS}({id})")).await
    }

    /// `POST odata/Alerts({id})/UiPath.Server.Configuration.OData.Acknowledge`
    pub async fn acknowledge(&self, id: i64, notes: Option<&str>) -> Result<(), Error> {
        debug!(id, "acknowledging alert");
        let body = notes.map_or_else(|| json!({}), |n| json!({ "notes": n }));
        self.client
            .post_no_response(
                &format!("{ALERTS}({id})/UiPath.Server.Configuration.OData.Acknowledge"),
                &body,
            )
            .await
    }

    /// `POST odata/Alerts({id})/UiPath.Server.Configuration.OData.Resolve`
    pub async fn resolve(&self, id: i64, resolution: Option<&str>) -> Result<(), Error> {
        debug!(id, "resolving alert");
        let body: Value = resolution.map_or_else(|| json!({}), |r| json!({ "resolution": r }));
        self.client
            .post_no_response(
                &format!("{ALERTS}({id})/UiPath.Server.Configuration.OData.Resolve"),
                &body,
            )
            .await
    }
}
