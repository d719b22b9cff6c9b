use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Extra;

/// A package in the processes or libraries feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Package {
    /// Package identifier, e.g. `Invoices`.
    pub id: String,
    /// `{Id}:{Version}`, used by download and delete.
    pub key: Option<String>,
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub published: Option<String>,
    pub is_latest_version: Option<bool>,
    pub is_active: Option<bool>,
    pub authors: Option<String>,
    pub release_notes: Option<String>,
    pub tags: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Declared input and output arguments of a package entry point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageArguments {
    /// JSON-encoded argument list.
    pub input: Option<String>,
    pub output: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A process deployed into a folder at a given package version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Release {
    pub id: i64,
    pub key: Option<Uuid>,
    pub name: Option<String>,
    pub process_key: Option<String>,
    pub process_version: Option<String>,
    pub is_latest_version: Option<bool>,
    pub is_process_deleted: Option<bool>,
    pub description: Option<String>,
    pub environment_id: Option<i64>,
    pub environment_name: Option<String>,
    pub entry_point_path: Option<String>,
    pub input_arguments: Option<String>,
    pub process_type: Option<String>,
    pub organization_unit_id: Option<i64>,
    pub organization_unit_fully_qualified_name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
