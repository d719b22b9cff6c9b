// Tenant administration entities: alerts, audit, users, tasks, settings.

use serde::{Deserialize, Serialize};

use super::Extra;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Alert {
    pub id: Option<String>,
    pub notification_name: Option<String>,
    pub data: Option<String>,
    pub component: Option<String>,
    pub severity: Option<String>,
    pub state: Option<String>,
    pub creation_time: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuditLog {
    pub id: i64,
    pub service_name: Option<String>,
    pub method_name: Option<String>,
    pub action: Option<String>,
    pub component: Option<String>,
    pub display_name: Option<String>,
    pub entity_id: Option<i64>,
    pub operation_text: Option<String>,
    pub user_name: Option<String>,
    pub execution_time: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: i64,
    pub user_name: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub full_name: Option<String>,
    pub email_address: Option<String>,
    pub is_active: Option<bool>,
    #[serde(rename = "Type")]
    pub user_type: Option<String>,
    #[serde(default)]
    pub roles_list: Vec<String>,
    pub last_login_time: Option<String>,
    pub creation_time: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Classic robot environment (group of robots).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "Type")]
    pub environment_type: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// An action-center task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    pub id: i64,
    pub title: Option<String>,
    #[serde(rename = "Type")]
    pub task_type: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assigned_to_user_id: Option<i64>,
    pub creation_time: Option<String>,
    pub last_modification_time: Option<String>,
    pub action: Option<String>,
    pub data: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A form task: a task whose data is collected through a form layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskForm {
    pub id: i64,
    pub title: Option<String>,
    pub status: Option<String>,
    pub form_layout: Option<serde_json::Value>,
    pub data: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Setting {
    pub id: Option<String>,
    pub name: String,
    pub value: Option<String>,
    pub scope: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Entity count from `api/Stats/GetCountStats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountStat {
    pub title: String,
    pub count: i64,
    #[serde(default)]
    pub has_permissions: Option<bool>,
}

/// Maintenance mode phase of a tenant or host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum MaintenancePhase {
    None,
    Draining,
    Suspended,
}
