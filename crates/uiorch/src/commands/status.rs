//! Connectivity check.

use serde_json::json;

use uiorch_api::OrchestratorClient;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(client: &OrchestratorClient, global: &GlobalOpts) -> Result<(), CliError> {
    let body = client.status().get().await?;
    let report = json!({
        "url": client.base_url().as_str(),
        "reachable": true,
        "status": body,
    });

    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => {
            format!("Orchestrator at {} is reachable", client.base_url())
        }
        OutputFormat::Json => output::render_json_pretty(&report)?,
        OutputFormat::JsonCompact => output::render_json_compact(&report)?,
        OutputFormat::Yaml => output::render_yaml(&report)?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
