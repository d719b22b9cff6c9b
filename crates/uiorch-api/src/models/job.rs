use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{Extra, Release, Robot};
use crate::error::Error;

/// Lifecycle state of a job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum JobState {
    Pending,
    Running,
    Stopping,
    Terminating,
    Faulted,
    Successful,
    Stopped,
    Suspended,
    Resumed,
    /// A state this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl JobState {
    /// Whether the job will not change state again on its own.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Faulted | Self::Successful | Self::Stopped)
    }
}

/// How a running job is stopped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum StopStrategy {
    /// Ask the robot to stop at the next `Should Stop` checkpoint.
    SoftStop,
    /// Terminate the process.
    Kill,
}

/// How Orchestrator picks robots for a start-jobs request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum StartStrategy {
    All,
    Specific,
    RobotCount,
    JobsCount,
    ModernJobsCount,
}

/// One execution of a release on a robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Job {
    pub id: i64,
    pub key: Option<Uuid>,
    pub state: JobState,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub creation_time: Option<DateTime<Utc>>,
    pub release_name: Option<String>,
    pub source: Option<String>,
    pub source_type: Option<String>,
    #[serde(rename = "Type")]
    pub job_type: Option<String>,
    pub info: Option<String>,
    pub job_priority: Option<String>,
    pub batch_execution_key: Option<Uuid>,
    pub starting_schedule_id: Option<i64>,
    /// JSON-encoded input arguments, as sent by Orchestrator.
    pub input_arguments: Option<String>,
    /// JSON-encoded output arguments.
    pub output_arguments: Option<String>,
    pub host_machine_name: Option<String>,
    pub reference: Option<String>,
    pub organization_unit_id: Option<i64>,
    pub organization_unit_fully_qualified_name: Option<String>,
    /// Present when requested with `$expand=Robot`.
    pub robot: Option<Robot>,
    /// Present when requested with `$expand=Release`.
    pub release: Option<Release>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// The `startInfo` object of a start-jobs request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartInfo {
    pub release_key: Uuid,
    pub strategy: StartStrategy,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub robot_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs_count: Option<u32>,
    /// Input arguments as a JSON-encoded string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_arguments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub source: String,
}

impl StartInfo {
    /// Start one job of the given release on any available robot.
    pub fn new(release_key: Uuid) -> Self {
        Self {
            release_key,
            strategy: StartStrategy::ModernJobsCount,
            robot_ids: Vec::new(),
            jobs_count: Some(1),
            input_arguments: None,
            job_priority: None,
            reference: None,
            source: "Manual".into(),
        }
    }

    /// Run on exactly these robots.
    pub fn on_robots(mut self, robot_ids: Vec<i64>) -> Self {
        self.strategy = StartStrategy::Specific;
        self.robot_ids = robot_ids;
        self.jobs_count = None;
        self
    }

    pub fn jobs_count(mut self, count: u32) -> Self {
        self.jobs_count = Some(count);
        self
    }

    /// Encode `args` into the string form Orchestrator expects.
    pub fn input_arguments(mut self, args: &Value) -> Self {
        self.input_arguments = Some(args.to_string());
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.job_priority = Some(priority.into());
        self
    }

    /// Check the strategy-specific required fields.
    pub fn validate(&self) -> Result<(), Error> {
        match self.strategy {
            StartStrategy::Specific if self.robot_ids.is_empty() => Err(Error::validation(
                "robot_ids",
                "the Specific strategy needs at least one robot id",
            )),
            StartStrategy::JobsCount | StartStrategy::ModernJobsCount | StartStrategy::RobotCount
                if self.jobs_count.unwrap_or(0) == 0 =>
            {
                Err(Error::validation(
                    "jobs_count",
                    format!("the {} strategy needs a positive jobs count", self.strategy),
                ))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn job_parses_and_keeps_unmodelled_fields() {
        let job: Job = serde_json::from_value(json!({
            "Id": 42,
            "Key": "8066c309-cef8-4b47-9163-b273fc14cc43",
            "State": "Faulted",
            "StartTime": "2024-06-15T10:30:00.497Z",
            "EndTime": null,
            "ReleaseName": "Invoices_Prod",
            "Type": "Unattended",
            "HasMediaRecorded": false
        }))
        .unwrap();
        assert_eq!(job.id, 42);
        assert_eq!(job.state, JobState::Faulted);
        assert!(job.state.is_final());
        assert_eq!(job.job_type.as_deref(), Some("Unattended"));
        assert_eq!(job.extra.get("HasMediaRecorded"), Some(&json!(false)));
    }

    #[test]
    fn unknown_job_state_does_not_fail() {
        let job: Job = serde_json::from_value(json!({ "Id": 1, "State": "Hibernating" })).unwrap();
        assert_eq!(job.state, JobState::Unknown);
        assert_eq!("Running".parse::<JobState>().unwrap(), JobState::Running);
    }

    #[test]
    fn start_info_serializes_pascal_case() {
        let key = Uuid::nil();
        let info = StartInfo::new(key).input_arguments(&json!({ "Amount": 3 }));
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(
            value,
            json!({
                "ReleaseKey": key,
                "Strategy": "ModernJobsCount",
                "JobsCount": 1,
                "InputArguments": "{\"Amount\":3}",
                "Source": "Manual"
            })
        );
    }

    #[test]
    fn start_info_validation() {
        let key = Uuid::nil();
        assert!(StartInfo::new(key).validate().is_ok());
        assert!(StartInfo::new(key).on_robots(vec![]).validate().is_err());
        assert!(StartInfo::new(key).on_robots(vec![7]).validate().is_ok());
        assert!(StartInfo::new(key).jobs_count(0).validate().is_err());
    }
}
