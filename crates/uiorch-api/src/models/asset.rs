use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Extra;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum AssetValueType {
    Text,
    Bool,
    Integer,
    Credential,
    WindowsCredential,
    KeyValueList,
    DBConnectionString,
    HttpConnectionString,
    #[serde(other)]
    Unknown,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum AssetValueScope {
    #[default]
    Global,
    PerRobot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Asset {
    pub id: i64,
    pub key: Option<Uuid>,
    pub name: String,
    pub value_scope: Option<AssetValueScope>,
    pub value_type: Option<AssetValueType>,
    /// Display form of the value; credentials show only the username.
    pub value: Option<String>,
    pub string_value: Option<String>,
    pub bool_value: Option<bool>,
    pub int_value: Option<i64>,
    pub credential_username: Option<String>,
    pub description: Option<String>,
    pub can_be_deleted: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for creating an asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewAsset {
    pub name: String,
    pub value_scope: AssetValueScope,
    pub value_type: AssetValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub int_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewAsset {
    fn empty(name: impl Into<String>, value_type: AssetValueType) -> Self {
        Self {
            name: name.into(),
            value_scope: AssetValueScope::Global,
            value_type,
            string_value: None,
            bool_value: None,
            int_value: None,
            credential_username: None,
            credential_password: None,
            description: None,
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            string_value: Some(value.into()),
            ..Self::empty(name, AssetValueType::Text)
        }
    }

    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self {
            bool_value: Some(value),
            ..Self::empty(name, AssetValueType::Bool)
        }
    }

    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self {
            int_value: Some(value),
            ..Self::empty(name, AssetValueType::Integer)
        }
    }

    pub fn credential(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            credential_username: Some(username.into()),
            credential_password: Some(password.into()),
            ..Self::empty(name, AssetValueType::Credential)
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An asset value resolved for a specific robot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RobotAsset {
    pub name: String,
    pub value_type: Option<AssetValueType>,
    pub string_value: Option<String>,
    pub bool_value: Option<bool>,
    pub int_value: Option<i64>,
    pub credential_username: Option<String>,
    pub credential_password: Option<SecretString>,
    #[serde(flatten)]
    pub extra: Extra,
}
