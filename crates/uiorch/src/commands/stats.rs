//! Statistics command handlers.

use tabled::Tabled;

use uiorch_api::OrchestratorClient;
use uiorch_api::models::CountStat;

use crate::cli::{GlobalOpts, StatsArgs, StatsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Entity")]
    title: String,
    #[tabled(rename = "Count")]
    count: String,
}

impl From<&CountStat> for CountRow {
    fn from(s: &CountStat) -> Self {
        Self {
            title: s.title.clone(),
            // Orchestrator reports 0 for entities the caller may not read
            count: match s.has_permissions {
                Some(false) => "n/a".into(),
                _ => s.count.to_string(),
            },
        }
    }
}

pub async fn handle(
    client: &OrchestratorClient,
    args: StatsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let stats = match args.command {
        StatsCommand::Counts => client.stats().counts().await?,
        StatsCommand::Jobs => client.stats().jobs().await?,
    };
    let out = output::render_list(
        &global.output,
        &stats,
        |c| CountRow::from(c),
        |s| format!("{}\t{}", s.title, s.count),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
