// Audit log endpoints

use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use super::require;
use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::AuditLog;
use crate::odata::{Filter, ODataList, ODataQuery};

const AUDIT_LOGS: &str = "odata/AuditLogs";
const ACTIONS: &str = "odata/AuditLogs/UiPath.Server.Configuration.OData";

#[derive(Debug, Clone, Copy)]
pub struct Audit<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn audit(&self) -> Audit<'_> {
        Audit { client: self }
    }
}

impl Audit<'_> {
    /// Audit entries, optionally within a time window and for one component/action.
    ///
    /// `GET odata/AuditLogs`
    pub async fn list(
        &self,
        from: Option<&str>,
        to: Option<&str>,
        component: Option<&str>,
        action: Option<&str>,
    ) -> Result<ODataList<AuditLog>, Error> {
        let mut filter = Filter::new();
        if let Some(from) = from {
            filter = filter.gt("CreationTime", from);
        }
        if let Some(to) = to {
            filter = filter.lt("CreationTime", to);
        }
        let filter = filter
            .eq_str_opt("Component", component)
            .eq_str_opt("Action", action);
        debug!("listing audit logs");
        self.client
            .get_list(AUDIT_LOGS, &ODataQuery::from(filter))
            .await
    }

    /// Full change history of one entity.
    ///
    /// `GET odata/AuditLogs/UiPath.Server.Configuration.OData.GetAuditTrail`
    pub async fn trail(&self, entity_type: &str, entity_id: i64) -> Result<Value, Error> {
        require("entity_type", entity_type)?;
        self.client
            .get_with_params(
                &format!("{ACTIONS}.GetAuditTrail"),
                &[
                    ("entityType", entity_type.to_owned()),
                    ("entityId", entity_id.to_string()),
                ],
            )
            .await
    }

    /// Export audit entries as a file (`CSV` or `JSON`).
    ///
    /// `GET odata/AuditLogs/UiPath.Server.Configuration.OData.Export`
    pub async fn export(&self, from: &str, to: &str, format: &str) -> Result<Bytes, Error> {
        require("from", from)?;
        require("to", to)?;
        debug!(from, to, format, "exporting audit logs");
        self.client
            .get_bytes(
                &format!("{ACTIONS}.Export"),
                &[
                    ("from", from.to_owned()),
                    ("to", to.to_owned()),
                    ("format", format.to_owned()),
                ],
            )
            .await
    }
}
