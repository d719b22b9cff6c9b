//! Job command handlers.

use std::str::FromStr;

use tabled::Tabled;
use uuid::Uuid;

use uiorch_api::models::{Job, JobState, StartInfo, StopStrategy};
use uiorch_api::{Filter, OrchestratorClient};

use crate::cli::{GlobalOpts, JobsArgs, JobsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const JOBS: &str = "odata/Jobs";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct JobRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Process")]
    process: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Robot")]
    robot: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Ended")]
    ended: String,
}

impl JobRow {
    fn new(job: &Job, color: bool) -> Self {
        Self {
            id: job.id,
            process: util::or_dash(job.release_name.as_deref()),
            state: output::job_state(job.state, color),
            robot: util::or_dash(job.robot.as_ref().and_then(|r| r.name.as_deref())),
            host: util::or_dash(job.host_machine_name.as_deref()),
            started: util::short_time(job.start_time),
            ended: util::short_time(job.end_time),
        }
    }
}

fn detail(job: &Job, color: bool) -> String {
    output::detail_lines(&[
        ("ID", job.id.to_string()),
        ("Key", job.key.map(|k| k.to_string()).unwrap_or_default()),
        ("Process", job.release_name.clone().unwrap_or_default()),
        ("State", output::job_state(job.state, color)),
        (
            "Robot",
            job.robot
                .as_ref()
                .and_then(|r| r.name.clone())
                .unwrap_or_default(),
        ),
        ("Host", job.host_machine_name.clone().unwrap_or_default()),
        ("Source", job.source.clone().unwrap_or_default()),
        ("Reference", job.reference.clone().unwrap_or_default()),
        ("Created", util::short_time(job.creation_time)),
        ("Started", util::short_time(job.start_time)),
        ("Ended", util::short_time(job.end_time)),
        ("Info", job.info.clone().unwrap_or_default()),
        ("Input", job.input_arguments.clone().unwrap_or_default()),
        ("Output", job.output_arguments.clone().unwrap_or_default()),
    ])
}

// ── Helpers ─────────────────────────────────────────────────────────

fn parse_state(raw: &str) -> Result<JobState, CliError> {
    JobState::from_str(raw).map_err(|_| CliError::Validation {
        field: "state".into(),
        reason: format!(
            "unknown job state '{raw}' (expected Pending, Running, Stopping, Terminating, \
             Faulted, Successful, Stopped, Suspended, or Resumed)"
        ),
    })
}

/// Accept a release key as-is, otherwise look the release up by name.
async fn resolve_release_key(client: &OrchestratorClient, release: &str) -> Result<Uuid, CliError> {
    if let Ok(key) = Uuid::parse_str(release) {
        return Ok(key);
    }
    let found = client
        .releases()
        .find_by_name(release)
        .await?
        .ok_or_else(|| CliError::not_found("release", release, "releases list"))?;
    found.key.ok_or_else(|| CliError::Validation {
        field: "release".into(),
        reason: format!("release '{release}' has no key"),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &OrchestratorClient,
    args: JobsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        JobsCommand::List {
            list,
            state,
            release,
        } => {
            let mut filter = Filter::new();
            if let Some(ref state) = state {
                filter = filter.eq_str("State", &parse_state(state)?.to_string());
            }
            let filter = filter.eq_str_opt("ReleaseName", release.as_deref());
            let query = util::list_query(&list, filter, Some("CreationTime desc")).expand("Robot");

            let jobs: Vec<Job> = if list.all {
                util::fetch_all(client, JOBS, &query).await?
            } else {
                client.jobs().list(&query).await?.value
            };

            let out = output::render_list(
                &global.output,
                &jobs,
                |j| JobRow::new(j, color),
                |j| j.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        JobsCommand::Get { id } => {
            let job = client.jobs().get(id).await.map_err(|e| {
                if e.is_not_found() {
                    CliError::not_found("job", id.to_string(), "jobs list")
                } else {
                    e.into()
                }
            })?;
            let out = output::render_single(
                &global.output,
                &job,
                |j| detail(j, color),
                |j| j.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        JobsCommand::Start {
            release,
            robots,
            count,
            input,
            input_file,
            reference,
        } => {
            let release_key = resolve_release_key(client, &release).await?;

            let mut start = if robots.is_empty() {
                StartInfo::new(release_key).jobs_count(count)
            } else {
                StartInfo::new(release_key).on_robots(robots)
            };

            let args = match (input, input_file) {
                (Some(raw), _) => Some(serde_json::Value::Object(util::parse_json_object(
                    "input", &raw,
                )?)),
                (None, Some(path)) => Some(util::read_json_file(&path)?),
                (None, None) => None,
            };
            if let Some(ref args) = args {
                if !args.is_object() {
                    return Err(CliError::Validation {
                        field: "input".into(),
                        reason: "input arguments must be a JSON object".into(),
                    });
                }
                start = start.input_arguments(args);
            }
            if let Some(reference) = reference {
                start = start.reference(reference);
            }

            let jobs = client.jobs().start(&start).await?;
            tracing::info!(release = %release, started = jobs.len(), "jobs started");

            let out = output::render_list(
                &global.output,
                &jobs,
                |j| JobRow::new(j, color),
                |j| j.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        JobsCommand::Stop { ids, kill } => {
            let strategy = if kill {
                StopStrategy::Kill
            } else {
                StopStrategy::SoftStop
            };
            let verb = if kill { "Kill" } else { "Stop" };
            let prompt = match ids.as_slice() {
                [id] => format!("{verb} job {id}?"),
                _ => format!("{verb} {} jobs?", ids.len()),
            };
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }

            match ids.as_slice() {
                [id] => client.jobs().stop(*id, strategy).await?,
                _ => client.jobs().stop_many(&ids, strategy).await?,
            }
            if !global.quiet {
                eprintln!("Stop requested ({strategy}) for {} job(s)", ids.len());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_names_are_checked() {
        assert_eq!(parse_state("Faulted").ok(), Some(JobState::Faulted));
        assert!(matches!(
            parse_state("Exploded"),
            Err(CliError::Validation { ref field, .. }) if field == "state"
        ));
    }
}
