// Shared transport configuration for building reqwest::Client instances.
//
// Holds TLS, timeout, and retry settings. The token flows and the API
// client both build their HTTP clients through this module.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::error::Error;

const DEFAULT_USER_AGENT: &str = concat!("uiorch/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (on-prem Orchestrator with a self-signed cert).
    DangerAcceptInvalid,
}

/// Retry behaviour for transient failures.
///
/// Backoff is `initial_backoff * 2^attempt`, capped at `max_backoff`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// What to do with a response or transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryVerdict {
    Retry(Duration),
    GiveUp,
    /// 429 whose `Retry-After` exceeds the backoff ceiling.
    RateLimited(u64),
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (zero-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |d| d.min(self.max_backoff))
    }

    /// Decide whether a response status warrants another attempt.
    ///
    /// 429 is retried for every method since the server refused the work;
    /// gateway failures only for idempotent methods.
    pub(crate) fn on_status(
        &self,
        status: StatusCode,
        headers: &HeaderMap,
        attempt: u32,
        idempotent: bool,
    ) -> RetryVerdict {
        if status == StatusCode::TOO_MANY_REQUESTS {
            let wait = retry_after(headers);
            if attempt >= self.max_retries {
                return RetryVerdict::RateLimited(wait.map_or(0, |d| d.as_secs()));
            }
            return match wait {
                Some(d) if d > self.max_backoff => RetryVerdict::RateLimited(d.as_secs()),
                Some(d) => RetryVerdict::Retry(d),
                None => RetryVerdict::Retry(self.backoff(attempt)),
            };
        }

        let gateway = matches!(
            status,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
        );
        if gateway && idempotent && attempt < self.max_retries {
            RetryVerdict::Retry(self.backoff(attempt))
        } else {
            RetryVerdict::GiveUp
        }
    }

    /// Decide whether a transport failure warrants another attempt.
    ///
    /// A refused connection never reached the server, so any method may be
    /// retried. A timeout may have, so only idempotent methods are.
    pub(crate) fn on_transport(
        &self,
        err: &reqwest::Error,
        attempt: u32,
        idempotent: bool,
    ) -> RetryVerdict {
        if attempt >= self.max_retries {
            return RetryVerdict::GiveUp;
        }
        if err.is_connect() || (err.is_timeout() && idempotent) {
            RetryVerdict::Retry(self.backoff(attempt))
        } else {
            RetryVerdict::GiveUp
        }
    }
}

/// Parse a delta-seconds `Retry-After` header. HTTP-date values are ignored.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        self.build_client_with_headers(HeaderMap::new())
    }

    /// Build a `reqwest::Client` with additional default headers.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .default_headers(headers)
            .gzip(true);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(1),
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let p = policy();
        assert_eq!(p.backoff(0), Duration::from_millis(100));
        assert_eq!(p.backoff(1), Duration::from_millis(200));
        assert_eq!(p.backoff(3), Duration::from_millis(800));
        assert_eq!(p.backoff(4), Duration::from_secs(1));
        assert_eq!(p.backoff(40), Duration::from_secs(1));
    }

    #[test]
    fn gateway_errors_retry_only_when_idempotent() {
        let p = policy();
        let h = HeaderMap::new();
        assert_eq!(
            p.on_status(StatusCode::SERVICE_UNAVAILABLE, &h, 0, true),
            RetryVerdict::Retry(Duration::from_millis(100))
        );
        assert_eq!(
            p.on_status(StatusCode::SERVICE_UNAVAILABLE, &h, 0, false),
            RetryVerdict::GiveUp
        );
        assert_eq!(
            p.on_status(StatusCode::BAD_GATEWAY, &h, 3, true),
            RetryVerdict::GiveUp
        );
        assert_eq!(
            p.on_status(StatusCode::INTERNAL_SERVER_ERROR, &h, 0, true),
            RetryVerdict::GiveUp
        );
    }

    #[test]
    fn too_many_requests_honours_retry_after() {
        let p = policy();
        let mut h = HeaderMap::new();
        h.insert(RETRY_AFTER, HeaderValue::from_static("1"));
        assert_eq!(
            p.on_status(StatusCode::TOO_MANY_REQUESTS, &h, 0, false),
            RetryVerdict::Retry(Duration::from_secs(1))
        );

        h.insert(RETRY_AFTER, HeaderValue::from_static("120"));
        assert_eq!(
            p.on_status(StatusCode::TOO_MANY_REQUESTS, &h, 0, true),
            RetryVerdict::RateLimited(120)
        );
    }

    #[test]
    fn none_policy_never_retries() {
        let p = RetryPolicy::none();
        assert_eq!(
            p.on_status(StatusCode::SERVICE_UNAVAILABLE, &HeaderMap::new(), 0, true),
            RetryVerdict::GiveUp
        );
        assert_eq!(
            p.on_status(StatusCode::TOO_MANY_REQUESTS, &HeaderMap::new(), 0, true),
            RetryVerdict::RateLimited(0)
        );
    }
}
