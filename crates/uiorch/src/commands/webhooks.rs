//! Webhook command handlers.

use std::path::Path;

use tabled::Tabled;

use uiorch_api::OrchestratorClient;
use uiorch_api::models::{Webhook, WebhookEvent};
use uiorch_api::resources::webhooks;

use crate::cli::{GlobalOpts, WebhooksArgs, WebhooksCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct WebhookRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Events")]
    events: String,
}

impl From<&Webhook> for WebhookRow {
    fn from(w: &Webhook) -> Self {
        let events = if w.subscribe_to_all_events.unwrap_or(false) {
            "all".to_owned()
        } else {
            w.events
                .iter()
                .map(|e| e.event_type.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        Self {
            id: w.id,
            name: util::or_dash(w.name.as_deref()),
            url: w.url.clone(),
            enabled: if w.enabled { "yes" } else { "no" }.into(),
            events,
        }
    }
}

fn event_detail(e: &WebhookEvent) -> String {
    output::detail_lines(&[
        ("Type", e.event_type.clone()),
        ("Event", e.event_id.clone()),
        ("Time", e.timestamp.clone().unwrap_or_default()),
        ("Tenant", e.tenant_id.map(|t| t.to_string()).unwrap_or_default()),
        (
            "Folder",
            e.organization_unit_id
                .map(|f| f.to_string())
                .unwrap_or_default(),
        ),
    ])
}

pub async fn handle(
    client: &OrchestratorClient,
    args: WebhooksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        WebhooksCommand::List => {
            let hooks = client.without_folder().webhooks().list().await?.value;
            let out = output::render_list(
                &global.output,
                &hooks,
                |w| WebhookRow::from(w),
                |w| w.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        WebhooksCommand::Verify {
            secret,
            signature,
            body,
        } => verify(&secret, &signature, &body, global),
    }
}

/// Check a captured delivery against the shared secret, then print the event.
pub fn verify(
    secret: &str,
    signature: &str,
    body: &Path,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let payload = util::read_input(body)?;
    let event = webhooks::parse_event(secret.as_bytes(), &payload, signature)?;
    tracing::info!(event = %event.event_type, id = %event.event_id, "signature verified");

    let out = output::render_single(&global.output, &event, event_detail, |e| {
        e.event_type.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    const SECRET: &str = "hook-secret";
    const BODY: &str = r#"{"Type":"process.updated","EventId":"evt-9","TenantId":3}"#;

    fn quiet_opts() -> GlobalOpts {
        Cli::try_parse_from(["uiorch", "-q", "status"]).unwrap().global
    }

    #[test]
    fn verify_checks_the_given_delivery() {
        let dir = tempfile::tempdir().unwrap();
        let body = dir.path().join("delivery.json");
        std::fs::write(&body, BODY).unwrap();
        let global = quiet_opts();

        let good = webhooks::sign(SECRET.as_bytes(), BODY.as_bytes());
        verify(SECRET, &good, &body, &global).unwrap();

        let bad = webhooks::sign(b"other-secret", BODY.as_bytes());
        let err = verify(SECRET, &bad, &body, &global).unwrap_err();
        assert!(matches!(err, CliError::BadSignature));
    }
}
