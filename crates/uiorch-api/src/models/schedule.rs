use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Extra;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessSchedule {
    pub id: i64,
    pub key: Option<Uuid>,
    pub name: String,
    pub enabled: bool,
    pub release_id: Option<i64>,
    pub release_key: Option<Uuid>,
    pub release_name: Option<String>,
    pub package_name: Option<String>,
    /// Quartz cron expression, exactly as stored by Orchestrator.
    pub start_process_cron: Option<String>,
    pub start_process_cron_summary: Option<String>,
    pub start_process_next_occurrence: Option<String>,
    pub time_zone_id: Option<String>,
    pub input_arguments: Option<String>,
    pub stop_strategy: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewSchedule {
    pub name: String,
    pub enabled: bool,
    pub release_id: i64,
    pub start_process_cron: String,
    pub time_zone_id: String,
    /// Number of jobs started per trigger.
    pub start_strategy: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_arguments: Option<String>,
}

impl NewSchedule {
    pub fn new(name: impl Into<String>, release_id: i64, cron: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            release_id,
            start_process_cron: cron.into(),
            time_zone_id: "UTC".into(),
            start_strategy: 1,
            input_arguments: None,
        }
    }

    pub fn time_zone(mut self, time_zone_id: impl Into<String>) -> Self {
        self.time_zone_id = time_zone_id.into();
        self
    }
}
