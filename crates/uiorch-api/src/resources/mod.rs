// Orchestrator resource groups
//
// Each group is a borrowed handle over `OrchestratorClient`, obtained with
// an accessor such as `client.jobs()`. Handles carry no state of their own;
// folder scope and credentials come from the client they borrow.

pub mod alerts;
pub mod assets;
pub mod audit;
pub mod directory;
pub mod environments;
pub mod folders;
pub mod jobs;
pub mod libraries;
pub mod licensing;
pub mod logs;
pub mod machines;
pub mod maintenance;
pub mod metrics;
pub mod packages;
pub mod processes;
pub mod queues;
pub mod releases;
pub mod robots;
pub mod schedules;
pub mod settings;
pub mod stats;
pub mod status;
pub mod task_forms;
pub mod test_automation;
pub mod test_data_queues;
pub mod users;
pub mod webhooks;

pub use alerts::Alerts;
pub use assets::Assets;
pub use audit::Audit;
pub use directory::Directory;
pub use environments::Environments;
pub use folders::Folders;
pub use jobs::Jobs;
pub use libraries::Libraries;
pub use licensing::Licensing;
pub use logs::Logs;
pub use machines::Machines;
pub use maintenance::Maintenance;
pub use metrics::Metrics;
pub use packages::Packages;
pub use processes::Processes;
pub use queues::Queues;
pub use releases::Releases;
pub use robots::Robots;
pub use schedules::Schedules;
pub use settings::Settings;
pub use stats::Stats;
pub use status::Status;
pub use task_forms::TaskForms;
pub use test_automation::TestAutomation;
pub use test_data_queues::TestDataQueues;
pub use users::Users;
pub use webhooks::Webhooks;

use crate::error::Error;

/// Reject an empty or whitespace-only required string before any request.
pub(crate) fn require(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        Err(Error::validation(field, "must not be empty"))
    } else {
        Ok(())
    }
}

/// Push `(key, value)` when `value` is present.
pub(crate) fn push_opt<T: ToString>(
    params: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<T>,
) {
    if let Some(v) = value {
        params.push((key, v.to_string()));
    }
}
