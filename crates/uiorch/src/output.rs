//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use uiorch_api::models::JobState;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Job state label, colored by outcome when `color` is set.
pub fn job_state(state: JobState, color: bool) -> String {
    let label = state.to_string();
    if !color {
        return label;
    }
    match state {
        JobState::Successful => label.green().to_string(),
        JobState::Faulted => label.red().bold().to_string(),
        JobState::Running | JobState::Resumed => label.cyan().to_string(),
        JobState::Pending | JobState::Suspended => label.yellow().to_string(),
        JobState::Stopping | JobState::Terminating | JobState::Stopped => {
            label.dimmed().to_string()
        }
        JobState::Unknown => label,
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json_pretty(data)?,
        OutputFormat::JsonCompact => render_json_compact(data)?,
        OutputFormat::Yaml => render_yaml(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a `detail_fn` that returns a pre-formatted
/// key/value block, since single-item views don't use `Tabled`.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json_pretty(data)?,
        OutputFormat::JsonCompact => render_json_compact(data)?,
        OutputFormat::Yaml => render_yaml(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Align `label: value` pairs for single-item table views. Empty values are skipped.
pub fn detail_lines(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    pairs
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{k:<width$}  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(
    data: &T,
) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Compact single-line JSON.
pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(
    data: &T,
) -> Result<String, CliError> {
    Ok(serde_json::to_string(data)?)
}

/// YAML output.
pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: i64,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: &'static str,
    }

    fn items() -> Vec<Item> {
        vec![Item { id: 1, name: "alpha" }, Item { id: 2, name: "beta" }]
    }

    fn render(format: &OutputFormat) -> String {
        render_list(
            format,
            &items(),
            |i| ItemRow { id: i.id, name: i.name },
            |i| i.id.to_string(),
        )
        .unwrap()
    }

    #[test]
    fn list_formats() {
        assert_eq!(render(&OutputFormat::Plain), "1\n2");
        assert_eq!(
            render(&OutputFormat::JsonCompact),
            r#"[{"id":1,"name":"alpha"},{"id":2,"name":"beta"}]"#
        );
        assert!(render(&OutputFormat::Yaml).contains("name: beta"));
        let table = render(&OutputFormat::Table);
        assert!(table.contains("ID") && table.contains("alpha"));
    }

    #[test]
    fn detail_lines_align_and_skip_empty() {
        let out = detail_lines(&[
            ("ID", "7".into()),
            ("Reference", String::new()),
            ("State", "Running".into()),
        ]);
        assert_eq!(out, "ID     7\nState  Running");
    }

    #[test]
    fn uncolored_state_is_plain() {
        assert_eq!(job_state(JobState::Faulted, false), "Faulted");
        assert_ne!(job_state(JobState::Faulted, true), "Faulted");
    }
}
