use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Details parsed from a non-2xx Orchestrator response.
///
/// Orchestrator answers failures with either `{"message", "errorCode", "traceId"}`
/// (REST endpoints) or `{"error": {"code", "message"}}` (OData endpoints).
/// When neither shape parses, `message` holds the raw body or the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub error_code: Option<String>,
    pub trace_id: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)?;
        if let Some(ref code) = self.error_code {
            write!(f, " (error code {code})")?;
        }
        Ok(())
    }
}

/// Top-level error type for the `uiorch-api` crate.
///
/// Transport failures and API failures are kept apart; API failures carry
/// the status-specific variant so callers can `match` on not-found,
/// conflict, etc. without inspecting numbers.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The token endpoint rejected the credentials.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// HTTP 401 that survived a token refresh.
    #[error("Unauthorized: {0}")]
    Unauthorized(ApiError),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out. `timeout` is the configured per-request limit,
    /// unknown when the caller supplied its own `reqwest::Client`.
    #[error("Request timed out{}", timeout_suffix(.timeout.as_ref()))]
    Timeout { timeout: Option<Duration> },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    #[error("Bad request: {0}")]
    BadRequest(ApiError),

    #[error("Forbidden: {0}")]
    Forbidden(ApiError),

    #[error("Not found: {0}")]
    NotFound(ApiError),

    #[error("Conflict: {0}")]
    Conflict(ApiError),

    /// Throttled by Orchestrator and the advertised wait exceeded the retry budget.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// 5xx after retries were exhausted.
    #[error("Server error: {0}")]
    Server(ApiError),

    /// Any other non-2xx status.
    #[error("API error: {0}")]
    Api(ApiError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A required field was missing or malformed before the request was sent.
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Webhook payload signature did not match.
    #[error("Webhook signature mismatch")]
    InvalidSignature,
}

impl Error {
    /// Map a non-2xx status and its parsed body onto the matching variant.
    pub(crate) fn from_status(detail: ApiError) -> Self {
        match detail.status {
            400 => Self::BadRequest(detail),
            401 => Self::Unauthorized(detail),
            403 => Self::Forbidden(detail),
            404 => Self::NotFound(detail),
            409 => Self::Conflict(detail),
            500..=599 => Self::Server(detail),
            _ => Self::Api(detail),
        }
    }

    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The HTTP status behind this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(d)
            | Self::BadRequest(d)
            | Self::Forbidden(d)
            | Self::NotFound(d)
            | Self::Conflict(d)
            | Self::Server(d)
            | Self::Api(d) => Some(d.status),
            Self::RateLimited { .. } => Some(429),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The parsed error body, if this error came from an API response.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Unauthorized(d)
            | Self::BadRequest(d)
            | Self::Forbidden(d)
            | Self::NotFound(d)
            | Self::Conflict(d)
            | Self::Server(d)
            | Self::Api(d) => Some(d),
            _ => None,
        }
    }

    /// Returns `true` if credentials were rejected.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::Unauthorized(_))
    }

    /// Returns `true` if this is a transient error worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } | Self::RateLimited { .. } | Self::Server(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` if this is a "conflict" error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

fn timeout_suffix(timeout: Option<&Duration>) -> String {
    timeout
        .map(|t| format!(" after {}ms", t.as_millis()))
        .unwrap_or_default()
}
