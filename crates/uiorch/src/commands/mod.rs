//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod assets;
pub mod config_cmd;
pub mod folders;
pub mod jobs;
pub mod processes;
pub mod queues;
pub mod releases;
pub mod robots;
pub mod stats;
pub mod status;
pub mod util;
pub mod webhooks;

use uiorch_api::OrchestratorClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an Orchestrator-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &OrchestratorClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Jobs(args) => jobs::handle(client, args, global).await,
        Command::Queues(args) => queues::handle(client, args, global).await,
        Command::Assets(args) => assets::handle(client, args, global).await,
        Command::Robots(args) => robots::handle(client, args, global).await,
        Command::Processes(args) => processes::handle(client, args, global).await,
        Command::Releases(args) => releases::handle(client, args, global).await,
        Command::Folders(args) => folders::handle(client, args, global).await,
        Command::Webhooks(args) => webhooks::handle(client, args, global).await,
        Command::Status => status::handle(client, global).await,
        Command::Stats(args) => stats::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
