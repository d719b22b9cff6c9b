// Queue endpoints
//
// Queue definitions live under `odata/QueueDefinitions`, queue items under
// `odata/QueueItems`. Adding items and transaction handling go through the
// `odata/Queues` action set, which addresses the queue by name in the body.

use futures_util::Stream;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::require;
use crate::client::{DEFAULT_PAGE_SIZE, OrchestratorClient};
use crate::error::Error;
use crate::models::{
    BulkAddResult, BulkCommitType, QueueDefinition, QueueItem, QueueItemData, TransactionResult,
};
use crate::odata::{ODataList, ODataQuery};

const DEFINITIONS: &str = "odata/QueueDefinitions";
const ITEMS: &str = "odata/QueueItems";
const ACTIONS: &str = "odata/Queues/UiPathODataSvc";

/// Queue item body with the target queue name, as the `Queues` actions expect.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct NamedItem<'a> {
    name: &'a str,
    #[serde(flatten)]
    item: &'a QueueItemData,
}

#[derive(Debug, Clone, Copy)]
pub struct Queues<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn queues(&self) -> Queues<'_> {
        Queues { client: self }
    }
}

impl<'a> Queues<'a> {
    // ── Definitions ──────────────────────────────────────────────────

    /// `GET odata/QueueDefinitions`
    pub async fn list(&self, query: &ODataQuery) -> Result<ODataList<QueueDefinition>, Error> {
        debug!("listing queue definitions");
        self.client.get_list(DEFINITIONS, query).await
    }

    /// `GET odata/QueueDefinitions({id})`
    pub async fn get(&self, id: i64) -> Result<QueueDefinition, Error> {
        self.client.get(&format!("{DEFINITIONS}({id})")).await
    }

    /// `POST odata/QueueDefinitions`
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<QueueDefinition, Error> {
        debug!("creating queue definition");
        self.client.post(DEFINITIONS, body).await
    }

    /// `PUT odata/QueueDefinitions({id})`
    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, body: &B) -> Result<(), Error> {
        debug!(id, "updating queue definition");
        self.client
            .put_no_response(&format!("{DEFINITIONS}({id})"), body)
            .await
    }

    /// `DELETE odata/QueueDefinitions({id})`
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting queue definition");
        self.client.delete(&format!("{DEFINITIONS}({id})")).await
    }

    // ── Adding work ──────────────────────────────────────────────────

    /// Add one item to the named queue.
    ///
    /// `POST odata/Queues/UiPathODataSvc.AddQueueItem` with `{"itemData": ...}`
    pub async fn add_item(&self, queue_name: &str, item: &QueueItemData) -> Result<QueueItem, Error> {
        require("queue_name", queue_name)?;
        debug!(queue_name, reference = ?item.reference, "adding queue item");
        let item_data = NamedItem {
            name: queue_name,
            item,
        };
        let body = json!({ "itemData": item_data });
        self.client
            .post(&format!("{ACTIONS}.AddQueueItem"), &body)
            .await
    }

    /// Add many items with one call.
    ///
    /// `POST odata/Queues/UiPathODataSvc.BulkAddQueueItems`
    pub async fn bulk_add_items(
        &self,
        queue_name: &str,
        items: &[QueueItemData],
        commit_type: BulkCommitType,
    ) -> Result<BulkAddResult, Error> {
        require("queue_name", queue_name)?;
        if items.is_empty() {
            return Err(Error::validation("items", "at least one item is required"));
        }
        debug!(queue_name, count = items.len(), %commit_type, "bulk adding queue items");
        let queue_items: Vec<NamedItem<'_>> = items
            .iter()
            .map(|item| NamedItem {
                name: queue_name,
                item,
            })
            .collect();
        let body = json!({
            "queueName": queue_name,
            "commitType": commit_type,
            "queueItems": queue_items,
        });
        self.client
            .post(&format!("{ACTIONS}.BulkAddQueueItems"), &body)
            .await
    }

    // ── Transactions ─────────────────────────────────────────────────

    /// Take the next available item for processing.
    ///
    /// Returns `None` when the queue has nothing to hand out (204).
    ///
    /// `POST odata/Queues/UiPathODataSvc.StartTransaction`
    pub async fn start_transaction(
        &self,
        queue_name: &str,
        robot_identifier: Option<&str>,
        reference: Option<&str>,
    ) -> Result<Option<QueueItem>, Error> {
        require("queue_name", queue_name)?;
        debug!(queue_name, "starting transaction");
        let mut data = json!({ "Name": queue_name });
        if let Some(robot) = robot_identifier {
            data["RobotIdentifier"] = json!(robot);
        }
        if let Some(reference) = reference {
            data["Reference"] = json!(reference);
        }
        self.client
            .post_optional(
                &format!("{ACTIONS}.StartTransaction"),
                &json!({ "transactionData": data }),
            )
            .await
    }

    /// Report the outcome of a transaction.
    ///
    /// `POST odata/Queues({item_id})/UiPathODataSvc.SetTransactionResult`
    pub async fn set_transaction_result(
        &self,
        item_id: i64,
        result: &TransactionResult,
    ) -> Result<(), Error> {
        debug!(item_id, success = result.is_successful, "setting transaction result");
        self.client
            .post_no_response(
                &format!("odata/Queues({item_id})/UiPathODataSvc.SetTransactionResult"),
                &json!({ "transactionResult": result }),
            )
            .await
    }

    // ── Items ────────────────────────────────────────────────────────

    /// `GET odata/QueueItems`
    pub async fn items(&self, query: &ODataQuery) -> Result<ODataList<QueueItem>, Error> {
        debug!("listing queue items");
        self.client.get_list(ITEMS, query).await
    }

    pub async fn items_all(&self, query: &ODataQuery) -> Result<Vec<QueueItem>, Error> {
        self.client.collect_all(ITEMS, query, DEFAULT_PAGE_SIZE).await
    }

    pub fn items_stream(
        self,
        query: ODataQuery,
    ) -> impl Stream<Item = Result<QueueItem, Error>> + 'a {
        self.client.stream_all(ITEMS, query, DEFAULT_PAGE_SIZE)
    }

    /// `GET odata/QueueItems({id})`
    pub async fn item(&self, id: i64) -> Result<QueueItem, Error> {
        self.client.get(&format!("{ITEMS}({id})")).await
    }

    /// Delete an item that has not been processed yet.
    ///
    /// `DELETE odata/QueueItems({id})`
    pub async fn delete_item(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting queue item");
        self.client.delete(&format!("{ITEMS}({id})")).await
    }
}
