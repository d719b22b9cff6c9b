use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Extra;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Folder {
    pub id: i64,
    pub key: Option<Uuid>,
    pub display_name: String,
    pub fully_qualified_name: Option<String>,
    pub description: Option<String>,
    pub provision_type: Option<String>,
    pub permission_model: Option<String>,
    pub parent_id: Option<i64>,
    pub feed_type: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewFolder {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    pub provision_type: String,
    pub permission_model: String,
}

impl NewFolder {
    /// A modern (fine-grained) folder.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            description: None,
            parent_id: None,
            provision_type: "Automatic".into(),
            permission_model: "FineGrained".into(),
        }
    }

    pub fn parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
