// Maintenance mode endpoints
//
// Host-level operations. `start`, `end`, and `get` take an optional tenant
// id; without it they act on the host.

use serde_json::{Value, json};
use tracing::{debug, info};

use super::push_opt;
use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::MaintenancePhase;

const MAINTENANCE: &str = "api/Maintenance";

#[derive(Debug, Clone, Copy)]
pub struct Maintenance<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn maintenance(&self) -> Maintenance<'_> {
        Maintenance { client: self }
    }
}

impl Maintenance<'_> {
    /// Enter a maintenance phase.
    ///
    /// `POST api/Maintenance/Start?phase=…&force=…&killJobs=…`
    pub async fn start(
        &self,
        phase: MaintenancePhase,
        force: bool,
        kill_jobs: bool,
        tenant_id: Option<i64>,
    ) -> Result<(), Error> {
        info!(%phase, force, kill_jobs, ?tenant_id, "starting maintenance");
        let mut params = vec![
            ("phase", phase.to_string()),
            ("force", force.to_string()),
            ("killJobs", kill_jobs.to_string()),
        ];
        push_opt(&mut params, "tenantId", tenant_id);
        self.client
            .post_params_no_response(&format!("{MAINTENANCE}/Start"), &params)
            .await
    }

    /// `POST api/Maintenance/End`
    pub async fn end(&self, tenant_id: Option<i64>) -> Result<(), Error> {
        info!(?tenant_id, "ending maintenance");
        let mut params = Vec::new();
        push_opt(&mut params, "tenantId", tenant_id);
        self.client
            .post_params_no_response(&format!("{MAINTENANCE}/End"), &params)
            .await
    }

    /// `GET api/Maintenance/Get`
    pub async fn get(&self, tenant_id: Option<i64>) -> Result<Value, Error> {
        let mut params = Vec::new();
        push_opt(&mut params, "tenantId", tenant_id);
        self.client
            .get_with_params(&format!("{MAINTENANCE}/Get"), &params)
            .await
    }

    /// `GET api/Maintenance/Status`
    pub async fn status(&self) -> Result<Value, Error> {
        self.client.get(&format!("{MAINTENANCE}/Status")).await
    }

    /// `POST api/Maintenance/Enable`, draining for `drain_minutes` first when set.
    pub async fn enable(&self, drain_minutes: Option<u32>) -> Result<(), Error> {
        debug!(?drain_minutes, "enabling maintenance mode");
        let body = drain_minutes.map_or_else(|| json!({}), |m| json!({ "drainTimeMinutes": m }));
        self.client
            .post_no_response(&format!("{MAINTENANCE}/Enable"), &body)
            .await
    }

    /// `POST api/Maintenance/Disable`
    pub async fn disable(&self) -> Result<(), Error> {
        debug!("disabling maintenance mode");
        self.client
            .post_params_no_response(&format!("{MAINTENANCE}/Disable"), &[])
            .await
    }

    /// `GET api/Maintenance/ActiveSessions`
    pub async fn active_sessions(&self) -> Result<Value, Error> {
        self.client
            .get(&format!("{MAINTENANCE}/ActiveSessions"))
            .await
    }
}
