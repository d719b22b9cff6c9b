//! Wire types for Orchestrator entities.
//!
//! Orchestrator serializes entities in PascalCase. Commonly used fields are
//! modelled; everything else is kept in each struct's flattened `extra` map
//! so nothing is lost when a value is read and written back.

use std::collections::HashMap;

use serde_json::Value;

mod admin;
mod asset;
mod folder;
mod job;
mod machine;
mod package;
mod queue;
mod robot;
mod schedule;
mod webhook;

pub use admin::{
    Alert, AuditLog, CountStat, Environment, MaintenancePhase, Setting, Task, TaskForm, User,
};
pub use asset::{Asset, AssetValueScope, AssetValueType, NewAsset, RobotAsset};
pub use folder::{Folder, NewFolder};
pub use job::{Job, JobState, StartInfo, StartStrategy, StopStrategy};
pub use machine::Machine;
pub use package::{Package, PackageArguments, Release};
pub use queue::{
    BulkAddResult, BulkCommitType, ExceptionType, ProcessingException, QueueDefinition, QueueItem,
    QueueItemData, QueueItemPriority, QueueItemStatus, TransactionResult,
};
pub use robot::{Robot, Session};
pub use schedule::{NewSchedule, ProcessSchedule};
pub use webhook::{NewWebhook, Webhook, WebhookEvent, WebhookEventSubscription, WebhookEventType};

/// Fields present on the wire but not modelled explicitly.
pub type Extra = HashMap<String, Value>;
