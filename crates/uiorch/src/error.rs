//! CLI error types with miette diagnostics.
//!
//! Maps `uiorch_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use uiorch_api::Error as ApiError;
use uiorch_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const RATE_LIMITED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to Orchestrator")]
    #[diagnostic(
        code(uiorch::connection_failed),
        help(
            "Check the profile URL and your network.\n\
             Try: uiorch status -v"
        )
    )]
    ConnectionFailed {
        #[source]
        source: ApiError,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(uiorch::tls_error),
        help("Use --insecure (-k) for self-signed certificates, or set ca_cert in your profile.")
    )]
    Tls { message: String },

    #[error("Request timed out{}", timeout_suffix(.timeout.as_ref()))]
    #[diagnostic(
        code(uiorch::timeout),
        help("Increase the timeout with --timeout or check Orchestrator responsiveness.")
    )]
    Timeout { timeout: Option<Duration> },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(uiorch::auth_failed),
        help(
            "Verify the client id, secret, and scopes of the profile.\n\
             Store a new secret with: uiorch config set-secret --profile <name>"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(uiorch::no_credentials),
        help(
            "Store a secret with: uiorch config set-secret --profile {profile}\n\
             Or pass --token / set UIORCH_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    #[error("Access denied: {message}")]
    #[diagnostic(
        code(uiorch::forbidden),
        help("The credentials lack a permission or scope for this call, or the folder is wrong.")
    )]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(uiorch::not_found),
        help("Run: uiorch {list_command} to see what exists in this folder")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Conflict: {message}")]
    #[diagnostic(code(uiorch::conflict))]
    Conflict { message: String },

    #[error("Rate limited by Orchestrator; retry after {seconds}s")]
    #[diagnostic(code(uiorch::rate_limited))]
    RateLimited { seconds: u64 },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}{}", error_code_suffix(.error_code.as_deref()))]
    #[diagnostic(code(uiorch::api_error))]
    Api {
        status: u16,
        message: String,
        error_code: Option<String>,
    },

    #[error(transparent)]
    #[diagnostic(code(uiorch::client))]
    Client(ApiError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(uiorch::validation))]
    Validation { field: String, reason: String },

    #[error("Webhook signature does not match the body")]
    #[diagnostic(
        code(uiorch::bad_signature),
        help("Check the secret, and that the body is byte-for-byte what was delivered.")
    )]
    BadSignature,

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(uiorch::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No configuration found")]
    #[diagnostic(
        code(uiorch::no_config),
        help(
            "Add a profile to {path}\n\
             or pass --url and --token."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(uiorch::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(uiorch::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(uiorch::json), help("Check the JSON input and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(uiorch::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::RateLimited { .. } => exit_code::RATE_LIMITED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn not_found(resource_type: &str, identifier: impl Into<String>, list_command: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        }
    }
}

fn timeout_suffix(timeout: Option<&Duration>) -> String {
    timeout
        .map(|t| format!(" after {}ms", t.as_millis()))
        .unwrap_or_default()
}

fn error_code_suffix(code: Option<&str>) -> String {
    code.map(|c| format!(" (error code {c})")).unwrap_or_default()
}

// ── uiorch_api::Error → CliError mapping ────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        if let ApiError::Transport(ref e) = err {
            if e.is_connect() || e.is_request() {
                return CliError::ConnectionFailed { source: err };
            }
        }
        match err {
            ApiError::Tls(message) => CliError::Tls { message },
            ApiError::Timeout { timeout } => CliError::Timeout { timeout },
            ApiError::Authentication { message } => CliError::AuthFailed { message },
            ApiError::Unauthorized(detail) => CliError::AuthFailed {
                message: detail.message,
            },
            ApiError::Forbidden(detail) => CliError::Forbidden {
                message: detail.message,
            },
            ApiError::NotFound(detail) => CliError::NotFound {
                resource_type: "resource".into(),
                identifier: detail.message,
                list_command: "--help".into(),
            },
            ApiError::Conflict(detail) => CliError::Conflict {
                message: detail.message,
            },
            ApiError::RateLimited { retry_after_secs } => CliError::RateLimited {
                seconds: retry_after_secs,
            },
            ApiError::BadRequest(detail) | ApiError::Server(detail) | ApiError::Api(detail) => {
                CliError::Api {
                    status: detail.status,
                    message: detail.message,
                    error_code: detail.error_code,
                }
            }
            ApiError::Validation { field, reason } => CliError::Validation { field, reason },
            ApiError::InvalidSignature => CliError::BadSignature,
            other => CliError::Client(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile, .. } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let nf: CliError = ApiError::NotFound(uiorch_api::ApiError {
            status: 404,
            message: "Job does not exist.".into(),
            error_code: Some("1002".into()),
            trace_id: None,
        })
        .into();
        assert_eq!(nf.exit_code(), exit_code::NOT_FOUND);

        let rl: CliError = ApiError::RateLimited {
            retry_after_secs: 60,
        }
        .into();
        assert_eq!(rl.exit_code(), exit_code::RATE_LIMITED);

        let auth: CliError = ApiError::Authentication {
            message: "invalid_client".into(),
        }
        .into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let bad: CliError = ApiError::Validation {
            field: "queue_name".into(),
            reason: "must not be empty".into(),
        }
        .into();
        assert_eq!(bad.exit_code(), exit_code::USAGE);

        let slow: CliError = ApiError::Timeout {
            timeout: Some(Duration::from_millis(500)),
        }
        .into();
        assert_eq!(slow.exit_code(), exit_code::TIMEOUT);
        assert_eq!(slow.to_string(), "Request timed out after 500ms");
    }
}
