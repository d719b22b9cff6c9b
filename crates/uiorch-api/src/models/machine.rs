use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Extra;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Machine {
    pub id: i64,
    pub key: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "Type")]
    pub machine_type: Option<String>,
    pub non_production_slots: Option<i32>,
    pub unattended_slots: Option<i32>,
    pub headless_slots: Option<i32>,
    pub test_automation_slots: Option<i32>,
    #[serde(flatten)]
    pub extra: Extra,
}
