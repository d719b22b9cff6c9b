//! Queue command handlers.

use std::str::FromStr;

use tabled::Tabled;

use uiorch_api::models::{QueueDefinition, QueueItem, QueueItemData, QueueItemPriority, QueueItemStatus};
use uiorch_api::{Filter, OrchestratorClient};

use crate::cli::{GlobalOpts, PriorityArg, QueuesArgs, QueuesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const DEFINITIONS: &str = "odata/QueueDefinitions";
const ITEMS: &str = "odata/QueueItems";

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Max Retries")]
    retries: String,
    #[tabled(rename = "Unique Ref")]
    unique_reference: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&QueueDefinition> for QueueRow {
    fn from(q: &QueueDefinition) -> Self {
        Self {
            id: q.id,
            name: q.name.clone(),
            retries: q
                .max_number_of_retries
                .map(|n| n.to_string())
                .unwrap_or_default(),
            unique_reference: q
                .enforce_unique_reference
                .map(|b| if b { "yes" } else { "no" }.to_owned())
                .unwrap_or_default(),
            description: q.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Reference")]
    reference: String,
    #[tabled(rename = "Retry")]
    retry: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&QueueItem> for ItemRow {
    fn from(i: &QueueItem) -> Self {
        Self {
            id: i.id,
            status: i.status.to_string(),
            priority: i.priority.map(|p| p.to_string()).unwrap_or_default(),
            reference: util::or_dash(i.reference.as_deref()),
            retry: i.retry_number.map(|n| n.to_string()).unwrap_or_default(),
            created: util::short_time(i.creation_time),
        }
    }
}

fn item_detail(item: &QueueItem) -> String {
    let content = item
        .specific_content
        .as_ref()
        .and_then(|c| serde_json::to_string(c).ok())
        .unwrap_or_default();
    output::detail_lines(&[
        ("ID", item.id.to_string()),
        ("Key", item.key.map(|k| k.to_string()).unwrap_or_default()),
        ("Status", item.status.to_string()),
        (
            "Priority",
            item.priority.map(|p| p.to_string()).unwrap_or_default(),
        ),
        ("Reference", item.reference.clone().unwrap_or_default()),
        ("Created", util::short_time(item.creation_time)),
        ("Content", content),
    ])
}

impl From<PriorityArg> for QueueItemPriority {
    fn from(p: PriorityArg) -> Self {
        match p {
            PriorityArg::Low => Self::Low,
            PriorityArg::Normal => Self::Normal,
            PriorityArg::High => Self::High,
        }
    }
}

fn parse_status(raw: &str) -> Result<QueueItemStatus, CliError> {
    QueueItemStatus::from_str(raw).map_err(|_| CliError::Validation {
        field: "status".into(),
        reason: format!(
            "unknown item status '{raw}' (expected New, InProgress, Failed, Successful, \
             Abandoned, Retried, or Deleted)"
        ),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &OrchestratorClient,
    args: QueuesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        QueuesCommand::List(list) => {
            let query = util::list_query(&list, Filter::new(), Some("Name"));
            let queues: Vec<QueueDefinition> = if list.all {
                util::fetch_all(client, DEFINITIONS, &query).await?
            } else {
                client.queues().list(&query).await?.value
            };
            let out = output::render_list(
                &global.output,
                &queues,
                |q| QueueRow::from(q),
                |q| q.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        QueuesCommand::Items {
            list,
            queue_id,
            status,
        } => {
            let mut filter = Filter::new();
            if let Some(id) = queue_id {
                filter = filter.eq("QueueDefinitionId", id);
            }
            if let Some(ref status) = status {
                filter = filter.eq_str("Status", &parse_status(status)?.to_string());
            }
            let query = util::list_query(&list, filter, Some("CreationTime desc"));
            let items: Vec<QueueItem> = if list.all {
                util::fetch_all(client, ITEMS, &query).await?
            } else {
                client.queues().items(&query).await?.value
            };
            let out = output::render_list(
                &global.output,
                &items,
                |i| ItemRow::from(i),
                |i| i.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        QueuesCommand::Add {
            queue,
            content,
            reference,
            priority,
        } => {
            let content = util::parse_json_object("content", &content)?;
            let mut data = QueueItemData::new(content).priority(priority.into());
            if let Some(reference) = reference {
                data = data.reference(reference);
            }

            let item = client.queues().add_item(&queue, &data).await?;
            tracing::info!(queue = %queue, item = item.id, "queue item added");

            let out =
                output::render_single(&global.output, &item, item_detail, |i| i.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
