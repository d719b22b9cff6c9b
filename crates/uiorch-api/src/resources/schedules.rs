// Process schedule (trigger) endpoints
//
// Cron expressions are Quartz syntax and are forwarded exactly as given;
// Orchestrator is the one that validates them.

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::require;
use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::{NewSchedule, ProcessSchedule};
use crate::odata::{ODataList, ODataQuery};

const SCHEDULES: &str = "odata/ProcessSchedules";

#[derive(Debug, Clone, Copy)]
pub struct Schedules<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn schedules(&self) -> Schedules<'_> {
        Schedules { client: self }
    }
}

impl Schedules<'_> {
    /// `GET odata/ProcessSchedules`
    pub async fn list(&self, query: &ODataQuery) -> Result<ODataList<ProcessSchedule>, Error> {
        debug!("listing schedules");
        self.client.get_list(SCHEDULES, query).await
    }

    /// `GET odata/ProcessSchedules({id})`
    pub async fn get(&self, id: i64) -> Result<ProcessSchedule, Error> {
        self.client.get(&format!("{SCHEDULES}({id})")).await
    }

    /// `POST odata/ProcessSchedules`
    pub async fn create(&self, schedule: &NewSchedule) -> Result<ProcessSchedule, Error> {
        require("name", &schedule.name)?;
        require("start_process_cron", &schedule.start_process_cron)?;
        debug!(name = %schedule.name, cron = %schedule.start_process_cron, "creating schedule");
        self.client.post(SCHEDULES, schedule).await
    }

    /// `PUT odata/ProcessSchedules({id})`
    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, body: &B) -> Result<(), Error> {
        debug!(id, "updating schedule");
        self.client
            .put_no_response(&format!("{SCHEDULES}({id})"), body)
            .await
    }

    /// `DELETE odata/ProcessSchedules({id})`
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting schedule");
        self.client.delete(&format!("{SCHEDULES}({id})")).await
    }

    /// Enable or disable several schedules at once.
    ///
    /// `POST odata/ProcessSchedules/UiPath.Server.Configuration.OData.SetEnabled`
    pub async fn set_enabled(&self, ids: &[i64], enabled: bool) -> Result<(), Error> {
        if ids.is_empty() {
            return Err(Error::validation("schedule_ids", "at least one schedule id is required"));
        }
        debug!(count = ids.len(), enabled, "toggling schedules");
        self.client
            .post_no_response(
                &format!("{SCHEDULES}/UiPath.Server.Configuration.OData.SetEnabled"),
                &json!({ "scheduleIds": ids, "enabled": enabled }),
            )
            .await
    }
}
