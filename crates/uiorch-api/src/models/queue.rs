use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::Extra;

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
pub enum QueueItemPriority {
    High,
    #[default]
    Normal,
    Low,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum QueueItemStatus {
    New,
    InProgress,
    Failed,
    Successful,
    Abandoned,
    Retried,
    Deleted,
    #[serde(other)]
    Unknown,
}

/// Whether a bulk add is all-or-nothing or best effort.
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
pub enum BulkCommitType {
    #[default]
    AllOrNothing,
    StopOnFirstFailure,
    ProcessAllIndependently,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum ExceptionType {
    ApplicationException,
    BusinessException,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueDefinition {
    pub id: i64,
    pub key: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub max_number_of_retries: Option<i32>,
    pub accept_automatically_retry: Option<bool>,
    pub enforce_unique_reference: Option<bool>,
    pub organization_unit_id: Option<i64>,
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueItem {
    pub id: i64,
    pub key: Option<Uuid>,
    pub queue_definition_id: Option<i64>,
    pub status: QueueItemStatus,
    pub review_status: Option<String>,
    pub reference: Option<String>,
    pub priority: Option<QueueItemPriority>,
    pub specific_content: Option<Map<String, Value>>,
    pub output: Option<Value>,
    pub processing_exception: Option<Value>,
    pub defer_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub start_processing: Option<DateTime<Utc>>,
    pub end_processing: Option<DateTime<Utc>>,
    pub creation_time: Option<DateTime<Utc>>,
    pub retry_number: Option<i32>,
    pub robot_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Content of a new queue item. The queue name is supplied separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueItemData {
    pub priority: QueueItemPriority,
    pub specific_content: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defer_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl QueueItemData {
    pub fn new(specific_content: Map<String, Value>) -> Self {
        Self {
            specific_content,
            ..Self::default()
        }
    }

    pub fn priority(mut self, priority: QueueItemPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Result of `BulkAddQueueItems`; `failed_items` is empty on full success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BulkAddResult {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub failed_items: Vec<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessingException {
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(rename = "Type")]
    pub exception_type: ExceptionType,
}

/// Outcome reported for a transaction started with `StartTransaction`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionResult {
    pub is_successful: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_exception: Option<ProcessingException>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Map<String, Value>>,
}

impl TransactionResult {
    pub fn success(output: Option<Map<String, Value>>) -> Self {
        Self {
            is_successful: true,
            processing_exception: None,
            output,
        }
    }

    pub fn failure(exception_type: ExceptionType, reason: impl Into<String>) -> Self {
        Self {
            is_successful: false,
            processing_exception: Some(ProcessingException {
                reason: reason.into(),
                details: None,
                exception_type,
            }),
            output: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn failure_result_shape() {
        let r = TransactionResult::failure(ExceptionType::BusinessException, "bad invoice");
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({
                "IsSuccessful": false,
                "ProcessingException": { "Reason": "bad invoice", "Type": "BusinessException" }
            })
        );
    }

    #[test]
    fn queue_item_parses() {
        let item: QueueItem = serde_json::from_value(json!({
            "Id": 9,
            "Status": "InProgress",
            "Priority": "High",
            "SpecificContent": { "Invoice": "INV-1" },
            "CreationTime": "2024-03-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(item.status, QueueItemStatus::InProgress);
        assert_eq!(item.priority, Some(QueueItemPriority::High));
        assert_eq!(item.specific_content.unwrap()["Invoice"], "INV-1");
    }
}
