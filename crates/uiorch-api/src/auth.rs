// Authentication flows and access-token caching.
//
// Orchestrator accepts a bearer token on every call. The token comes from
// one of several flows depending on where Orchestrator runs; this module
// fetches it lazily, caches it until shortly before expiry, and lets the
// client drop it when the server answers 401.

use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;

/// Refresh this long before the advertised expiry.
const EXPIRY_SKEW: Duration = Duration::from_secs(60);

/// Token endpoint of the legacy cloud refresh-token flow.
pub const ACCOUNT_TOKEN_URL: &str = "https://account.uipath.com/oauth/token";

/// Path of the identity server token endpoint, relative to the host.
pub const IDENTITY_TOKEN_PATH: &str = "/identity_/connect/token";

/// Credentials for authenticating against Orchestrator.
///
/// Each variant carries the secret material needed for its flow.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// OAuth2 client-credentials grant (external application).
    /// When `token_url` is `None` it is derived from the base URL's host
    /// as `https://{host}/identity_/connect/token`.
    ClientCredentials {
        client_id: String,
        client_secret: SecretString,
        scopes: Vec<String>,
        token_url: Option<Url>,
    },

    /// Legacy cloud refresh-token flow (`account.uipath.com`).
    RefreshToken {
        client_id: String,
        refresh_token: SecretString,
        token_url: Option<Url>,
    },

    /// On-premises username/password login via `api/Account/Authenticate`.
    Password {
        tenancy_name: String,
        username: String,
        password: SecretString,
    },

    /// A bearer token obtained elsewhere. Cannot be refreshed.
    Token { token: SecretString },
}

impl Credentials {
    /// Client-credentials grant with the default token URL.
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: SecretString,
        scopes: Vec<String>,
    ) -> Self {
        Self::ClientCredentials {
            client_id: client_id.into(),
            client_secret,
            scopes,
            token_url: None,
        }
    }

    /// A pre-issued bearer token.
    pub fn token(token: SecretString) -> Self {
        Self::Token { token }
    }

    /// Whether a rejected token can be replaced by running the flow again.
    pub fn can_refresh(&self) -> bool {
        !matches!(self, Self::Token { .. })
    }

    /// Short name of the flow, for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClientCredentials { .. } => "client_credentials",
            Self::RefreshToken { .. } => "refresh_token",
            Self::Password { .. } => "password",
            Self::Token { .. } => "token",
        }
    }
}

// ── Token cache ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub(crate) struct AccessToken {
    value: SecretString,
    expires_at: Option<Instant>,
}

impl AccessToken {
    fn new(value: SecretString, expires_in: Option<u64>, now: Instant) -> Self {
        Self {
            value,
            expires_at: expires_in.map(|secs| now + Duration::from_secs(secs)),
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now + EXPIRY_SKEW < at)
    }
}

/// OAuth2 token endpoint response.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// OAuth2 error response (`invalid_client`, `invalid_scope`, …).
#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// On-prem `api/Account/Authenticate` response.
#[derive(Deserialize)]
struct AuthenticateResponse {
    result: Option<String>,
    #[serde(default)]
    success: Option<bool>,
}

/// Runs the configured flow and caches the resulting token.
///
/// The lock is held across the fetch, so concurrent callers that find the
/// cache empty wait for a single token request instead of racing.
pub(crate) struct Authenticator {
    credentials: Credentials,
    base_url: Url,
    cache: Mutex<Option<AccessToken>>,
}

impl Authenticator {
    pub(crate) fn new(credentials: Credentials, base_url: Url) -> Self {
        Self {
            credentials,
            base_url,
            cache: Mutex::new(None),
        }
    }

    pub(crate) fn can_refresh(&self) -> bool {
        self.credentials.can_refresh()
    }

    /// Return a valid bearer token, running the flow if needed.
    pub(crate) async fn token(&self, http: &reqwest::Client) -> Result<SecretString, Error> {
        let mut guard = self.cache.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            trace!("using cached access token");
            return Ok(token.value.clone());
        }

        let fresh = self.fetch(http).await?;
        let value = fresh.value.clone();
        *guard = Some(fresh);
        Ok(value)
    }

    /// Drop the cached token if it is still the one the server rejected.
    pub(crate) async fn invalidate(&self, rejected: &SecretString) {
        let mut guard = self.cache.lock().await;
        if guard
            .as_ref()
            .is_some_and(|t| t.value.expose_secret() == rejected.expose_secret())
        {
            debug!("discarding rejected access token");
            *guard = None;
        }
    }

    async fn fetch(&self, http: &reqwest::Client) -> Result<AccessToken, Error> {
        match &self.credentials {
            Credentials::ClientCredentials {
                client_id,
                client_secret,
                scopes,
                token_url,
            } => {
                let url = match token_url {
                    Some(u) => u.clone(),
                    None => identity_token_url(&self.base_url),
                };
                debug!(%url, client_id, "requesting client-credentials token");

                let scope = scopes.join(" ");
                let mut form = vec![
                    ("grant_type", "client_credentials"),
                    ("client_id", client_id.as_str()),
                    ("client_secret", client_secret.expose_secret()),
                ];
                if !scope.is_empty() {
                    form.push(("scope", scope.as_str()));
                }

                let resp = http.post(url).form(&form).send().await?;
                oauth_token(resp).await
            }

            Credentials::RefreshToken {
                client_id,
                refresh_token,
                token_url,
            } => {
                let url = match token_url {
                    Some(u) => u.clone(),
                    None => Url::parse(ACCOUNT_TOKEN_URL)?,
                };
                debug!(%url, client_id, "refreshing access token");

                let body = json!({
                    "grant_type": "refresh_token",
                    "client_id": client_id,
                    "refresh_token": refresh_token.expose_secret(),
                });
                let resp = http.post(url).json(&body).send().await?;
                oauth_token(resp).await
            }

            Credentials::Password {
                tenancy_name,
                username,
                password,
            } => {
                let url = self.base_url.join("api/Account/Authenticate")?;
                debug!(%url, username, tenancy_name, "authenticating with password");

                let body = json!({
                    "tenancyName": tenancy_name,
                    "usernameOrEmailAddress": username,
                    "password": password.expose_secret(),
                });
                let resp = http.post(url).json(&body).send().await?;
                let status = resp.status();
                let raw = resp.text().await?;
                if !status.is_success() {
                    return Err(Error::Authentication {
                        message: format!("login failed (HTTP {status}): {}", preview(&raw)),
                    });
                }

                let parsed: AuthenticateResponse =
                    serde_json::from_str(&raw).map_err(|e| Error::Deserialization {
                        message: format!("{e} (body preview: {:?})", preview(&raw)),
                        body: raw.clone(),
                    })?;
                match parsed.result {
                    Some(token) if parsed.success.unwrap_or(true) => Ok(AccessToken::new(
                        SecretString::from(token),
                        None,
                        Instant::now(),
                    )),
                    _ => Err(Error::Authentication {
                        message: "login response did not contain a token".into(),
                    }),
                }
            }

            Credentials::Token { token } => Ok(AccessToken::new(token.clone(), None, Instant::now())),
        }
    }
}

/// Derive the identity server token endpoint from the Orchestrator base URL.
pub(crate) fn identity_token_url(base_url: &Url) -> Url {
    let mut url = base_url.clone();
    url.set_path(IDENTITY_TOKEN_PATH);
    url.set_query(None);
    url.set_fragment(None);
    url
}

async fn oauth_token(resp: reqwest::Response) -> Result<AccessToken, Error> {
    let status = resp.status();
    let raw = resp.text().await?;

    if !status.is_success() {
        let message = match serde_json::from_str::<TokenErrorResponse>(&raw) {
            Ok(err) => match err.error_description {
                Some(desc) => format!("{}: {desc}", err.error),
                None => err.error,
            },
            Err(_) => preview(&raw).to_owned(),
        };
        return Err(Error::Authentication {
            message: format!("token request failed (HTTP {status}): {message}"),
        });
    }

    let token: TokenResponse = serde_json::from_str(&raw).map_err(|e| Error::Deserialization {
        message: format!("{e} (token response)"),
        body: String::new(),
    })?;
    debug!(expires_in = ?token.expires_in, "access token issued");
    Ok(AccessToken::new(
        SecretString::from(token.access_token),
        token.expires_in,
        Instant::now(),
    ))
}

fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..end]
}
