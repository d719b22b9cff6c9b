use serde::{Deserialize, Serialize};

use super::Extra;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Robot {
    pub id: i64,
    pub name: Option<String>,
    pub machine_name: Option<String>,
    pub machine_id: Option<i64>,
    pub username: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    #[serde(rename = "Type")]
    pub robot_type: Option<String>,
    pub hosting_type: Option<String>,
    pub provision_type: Option<String>,
    pub enabled: Option<bool>,
    pub robot_environments: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Live connection state of a robot on a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Session {
    pub session_id: Option<i64>,
    pub state: Option<String>,
    pub machine_name: Option<String>,
    pub host_machine_name: Option<String>,
    pub reporting_time: Option<String>,
    pub is_unresponsive: Option<bool>,
    pub robot: Option<Robot>,
    #[serde(flatten)]
    pub extra: Extra,
}
