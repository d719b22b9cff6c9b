// Test data queue endpoints

use serde_json::{Value, json};
use tracing::debug;

use super::require;
use crate::client::OrchestratorClient;
use crate::error::Error;

const ACTIONS: &str = "api/TestDataQueueActions";

#[derive(Debug, Clone, Copy)]
pub struct TestDataQueues<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn test_data_queues(&self) -> TestDataQueues<'_> {
        TestDataQueues { client: self }
    }
}

impl TestDataQueues<'_> {
    /// `POST api/TestDataQueueActions/AddItem`
    pub async fn add_item(&self, queue_name: &str, content: &Value) -> Result<Value, Error> {
        require("queue_name", queue_name)?;
        debug!(queue_name, "adding test data queue item");
        self.client
            .post(
                &format!("{ACTIONS}/AddItem"),
                &json!({ "QueueName": queue_name, "Content": content }),
            )
            .await
    }

    /// Add several items. Returns how many were added.
    ///
    /// `POST api/TestDataQueueActions/BulkAddItems`
    pub async fn bulk_add_items(&self, queue_name: &str, items: &[Value]) -> Result<i64, Error> {
        require("queue_name", queue_name)?;
        if items.is_empty() {
            return Err(Error::validation("items", "at least one item is required"));
        }
        debug!(queue_name, count = items.len(), "bulk adding test data queue items");
        self.client
            .post(
                &format!("{ACTIONS}/BulkAddItems"),
                &json!({ "QueueName": queue_name, "Items": items }),
            )
            .await
    }

    /// `DELETE api/TestDataQueueActions/DeleteAllItems?queueName=…`
    pub async fn delete_all_items(&self, queue_name: &str) -> Result<(), Error> {
        require("queue_name", queue_name)?;
        debug!(queue_name, "clearing test data queue");
        self.client
            .delete_with_params(
                &format!("{ACTIONS}/DeleteAllItems"),
                &[("queueName", queue_name.to_owned())],
            )
            .await
    }
}
