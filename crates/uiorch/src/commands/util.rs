//! Shared helpers for command handlers.

use std::io::{IsTerminal, Read};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use uiorch_api::client::DEFAULT_PAGE_SIZE;
use uiorch_api::{Filter, ODataQuery, OrchestratorClient};

use crate::cli::ListArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal on stdin there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--*-file` flags.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Read a file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read(path)?)
    }
}

/// Parse a flag value that must be a JSON object.
pub fn parse_json_object(field: &str, raw: &str) -> Result<Map<String, Value>, CliError> {
    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::Validation {
            field: field.into(),
            reason: "expected a JSON object".into(),
        }),
        Err(e) => Err(CliError::Validation {
            field: field.into(),
            reason: format!("invalid JSON: {e}"),
        }),
    }
}

/// Turn list flags plus a command's own filter clauses into an OData query.
///
/// A raw `--filter` is parenthesized so its `or`s cannot escape.
pub fn list_query(list: &ListArgs, filter: Filter, default_order: Option<&str>) -> ODataQuery {
    let filter = match list.filter.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => filter.raw(format!("({raw})")),
        _ => filter,
    };

    let mut query = ODataQuery::new()
        .with_filter(&filter)
        .top(list.limit)
        .skip(list.skip);
    if let Some(order) = list.order_by.as_deref().or(default_order) {
        query = query.order_by(order);
    }
    query
}

/// Every page of `path` for `--all`; `$skip` is the starting offset.
pub async fn fetch_all<T: DeserializeOwned>(
    client: &OrchestratorClient,
    path: &str,
    query: &ODataQuery,
) -> Result<Vec<T>, CliError> {
    tracing::debug!(path, "following pagination");
    Ok(client.collect_all(path, query, DEFAULT_PAGE_SIZE).await?)
}

/// Short local-time rendering for table cells.
pub fn short_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

pub fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_owned()
}
