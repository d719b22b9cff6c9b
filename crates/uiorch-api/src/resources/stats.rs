// Dashboard statistics endpoints

use serde_json::Value;

use super::push_opt;
use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::CountStat;

const STATS: &str = "api/Stats";

#[derive(Debug, Clone, Copy)]
pub struct Stats<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn stats(&self) -> Stats<'_> {
        Stats { client: self }
    }
}

impl Stats<'_> {
    /// `GET api/Stats/GetConsumptionLicenseStats`
    pub async fn consumption_license(
        &self,
        tenant_id: Option<i64>,
        days: Option<u32>,
    ) -> Result<Value, Error> {
        let mut params = Vec::new();
        push_opt(&mut params, "tenantId", tenant_id);
        push_opt(&mut params, "days", days);
        self.client
            .get_with_params(&format!("{STATS}/GetConsumptionLicenseStats"), &params)
            .await
    }

    /// Number of processes, assets, queues, and other entities in the tenant.
    ///
    /// `GET api/Stats/GetCountStats`
    pub async fn counts(&self) -> Result<Vec<CountStat>, Error> {
        self.client.get(&format!("{STATS}/GetCountStats")).await
    }

    /// Job totals per state.
    ///
    /// `GET api/Stats/GetJobsStats`
    pub async fn jobs(&self) -> Result<Vec<CountStat>, Error> {
        self.client.get(&format!("{STATS}/GetJobsStats")).await
    }

    /// `GET api/Stats/GetLicenseStats`
    pub async fn license(&self, tenant_id: Option<i64>, days: Option<u32>) -> Result<Value, Error> {
        let mut params = Vec::new();
        push_opt(&mut params, "tenantId", tenant_id);
        push_opt(&mut params, "days", days);
        self.client
            .get_with_params(&format!("{STATS}/GetLicenseStats"), &params)
            .await
    }

    /// Robot totals per session state.
    ///
    /// `GET api/Stats/GetSessionsStats`
    pub async fn sessions(&self) -> Result<Vec<CountStat>, Error> {
        self.client.get(&format!("{STATS}/GetSessionsStats")).await
    }
}
