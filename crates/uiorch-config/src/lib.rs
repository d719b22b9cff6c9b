//! Shared configuration for the uiorch CLI and other front ends.
//!
//! TOML profiles, secret resolution (env + keyring + plaintext), and
//! translation to `uiorch_api::ClientConfig`. The CLI layers its flag
//! overrides on top of what this crate produces.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use uiorch_api::{ClientConfig, Credentials, FolderScope, RetryPolicy, TlsMode, TransportConfig};

/// Service name under which secrets are stored in the system keyring.
pub const KEYRING_SERVICE: &str = "uiorch";

/// Prefix for environment overrides, e.g. `UIORCH_DEFAULTS__TIMEOUT=60`.
pub const ENV_PREFIX: &str = "UIORCH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("no {kind} configured for profile '{profile}'")]
    NoCredentials { profile: String, kind: SecretKind },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named Orchestrator profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Pick a profile: the explicit name, else `default_profile`, else `"default"`.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
            .to_owned();
        match self.profiles.get(&name) {
            Some(profile) => Ok((name, profile)),
            None => Err(ConfigError::UnknownProfile { name }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    3
}

/// How a profile obtains its bearer token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// External application with client id and secret.
    #[default]
    ClientCredentials,
    /// Legacy cloud refresh token.
    RefreshToken,
    /// On-prem username and password.
    Password,
    /// Pre-issued bearer token.
    Token,
}

/// A named Orchestrator profile.
///
/// Either `url` or `organization` + `tenant` locates the tenant.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Full Orchestrator base URL, for on-prem or custom hosts.
    pub url: Option<String>,

    /// Automation Cloud organization (account logical name).
    pub organization: Option<String>,

    /// Automation Cloud tenant logical name.
    pub tenant: Option<String>,

    /// Value for the `X-UIPATH-TenantName` header. Defaults to `tenant`.
    pub tenant_name: Option<String>,

    pub folder_id: Option<i64>,
    pub folder_path: Option<String>,

    #[serde(default)]
    pub auth_mode: AuthMode,

    pub client_id: Option<String>,
    /// Client secret (plaintext; prefer keyring or env var).
    pub client_secret: Option<String>,
    /// Environment variable holding the client secret.
    pub client_secret_env: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Override for the token endpoint.
    pub token_url: Option<String>,

    pub refresh_token: Option<String>,
    pub refresh_token_env: Option<String>,

    pub tenancy_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_env: Option<String>,

    pub token: Option<String>,
    pub token_env: Option<String>,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,
    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,
    /// Override the default timeout (seconds).
    pub timeout: Option<u64>,
}

// ── Secrets ─────────────────────────────────────────────────────────

/// The secret a profile needs, depending on its auth mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    ClientSecret,
    RefreshToken,
    Password,
    Token,
}

impl SecretKind {
    /// Key suffix in the keyring: `{profile}/{suffix}`.
    pub fn keyring_suffix(self) -> &'static str {
        match self {
            Self::ClientSecret => "client-secret",
            Self::RefreshToken => "refresh-token",
            Self::Password => "password",
            Self::Token => "token",
        }
    }

    /// Environment variable consulted when the profile names none.
    pub fn default_env(self) -> &'static str {
        match self {
            Self::ClientSecret => "UIORCH_CLIENT_SECRET",
            Self::RefreshToken => "UIORCH_REFRESH_TOKEN",
            Self::Password => "UIORCH_PASSWORD",
            Self::Token => "UIORCH_TOKEN",
        }
    }

    pub fn for_mode(mode: AuthMode) -> Self {
        match mode {
            AuthMode::ClientCredentials => Self::ClientSecret,
            AuthMode::RefreshToken => Self::RefreshToken,
            AuthMode::Password => Self::Password,
            AuthMode::Token => Self::Token,
        }
    }

    fn profile_fields(self, profile: &Profile) -> (Option<&str>, Option<&str>) {
        match self {
            Self::ClientSecret => (
                profile.client_secret_env.as_deref(),
                profile.client_secret.as_deref(),
            ),
            Self::RefreshToken => (
                profile.refresh_token_env.as_deref(),
                profile.refresh_token.as_deref(),
            ),
            Self::Password => (profile.password_env.as_deref(), profile.password.as_deref()),
            Self::Token => (profile.token_env.as_deref(), profile.token.as_deref()),
        }
    }
}

impl std::fmt::Display for SecretKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.keyring_suffix().replace('-', " "))
    }
}

fn keyring_entry(profile_name: &str, kind: SecretKind) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/{}", kind.keyring_suffix()),
    )
}

/// Resolve a secret: the profile's `*_env` variable, then the kind's
/// default variable, then the system keyring, then plaintext config.
pub fn resolve_secret(
    profile: &Profile,
    profile_name: &str,
    kind: SecretKind,
) -> Result<SecretString, ConfigError> {
    resolve_secret_with(profile, profile_name, kind, |name| std::env::var(name).ok())
}

/// [`resolve_secret`] with a caller-supplied environment lookup.
pub fn resolve_secret_with<F>(
    profile: &Profile,
    profile_name: &str,
    kind: SecretKind,
    env: F,
) -> Result<SecretString, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let (env_name, plaintext) = kind.profile_fields(profile);

    // 1. Environment
    let from_env = env_name
        .and_then(&env)
        .or_else(|| env(kind.default_env()))
        .filter(|v| !v.is_empty());
    if let Some(val) = from_env {
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if let Ok(secret) = keyring_entry(profile_name, kind).and_then(|e| e.get_password()) {
        return Ok(SecretString::from(secret));
    }

    // 3. Plaintext in config
    if let Some(val) = plaintext.filter(|v| !v.is_empty()) {
        return Ok(SecretString::from(val.to_owned()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        kind,
    })
}

/// Store a secret for a profile in the system keyring.
pub fn store_secret(
    profile_name: &str,
    kind: SecretKind,
    secret: &SecretString,
) -> Result<(), ConfigError> {
    keyring_entry(profile_name, kind)?.set_password(secret.expose_secret())?;
    Ok(())
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "uiorch", "uiorch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("uiorch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to the API client ───────────────────────────────────

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| invalid(field, format!("{raw}: {e}")))
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| invalid(field, "is required for this auth mode"))
}

/// Build `Credentials` from a profile's `auth_mode`.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    resolve_credentials_with(profile, profile_name, |name| std::env::var(name).ok())
}

fn resolve_credentials_with<F>(
    profile: &Profile,
    profile_name: &str,
    env: F,
) -> Result<Credentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let kind = SecretKind::for_mode(profile.auth_mode);
    let token_url = profile
        .token_url
        .as_deref()
        .map(|u| parse_url("token_url", u))
        .transpose()?;

    match profile.auth_mode {
        AuthMode::ClientCredentials => {
            let client_id = required("client_id", profile.client_id.as_deref())?;
            Ok(Credentials::ClientCredentials {
                client_id: client_id.to_owned(),
                client_secret: resolve_secret_with(profile, profile_name, kind, env)?,
                scopes: profile.scopes.clone(),
                token_url,
            })
        }
        AuthMode::RefreshToken => {
            let client_id = required("client_id", profile.client_id.as_deref())?;
            Ok(Credentials::RefreshToken {
                client_id: client_id.to_owned(),
                refresh_token: resolve_secret_with(profile, profile_name, kind, env)?,
                token_url,
            })
        }
        AuthMode::Password => {
            let username = required("username", profile.username.as_deref())?;
            Ok(Credentials::Password {
                tenancy_name: profile
                    .tenancy_name
                    .clone()
                    .unwrap_or_else(|| "Default".into()),
                username: username.to_owned(),
                password: resolve_secret_with(profile, profile_name, kind, env)?,
            })
        }
        AuthMode::Token => Ok(Credentials::Token {
            token: resolve_secret_with(profile, profile_name, kind, env)?,
        }),
    }
}

/// Build a `ClientConfig` from a profile, without command-line overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let credentials = resolve_credentials(profile, profile_name)?;
    build_client_config(profile, defaults, credentials)
}

/// Assemble a `ClientConfig` around already-resolved credentials.
pub fn build_client_config(
    profile: &Profile,
    defaults: &Defaults,
    credentials: Credentials,
) -> Result<ClientConfig, ConfigError> {
    let mut config = match (
        profile.url.as_deref(),
        profile.organization.as_deref(),
        profile.tenant.as_deref(),
    ) {
        (Some(url), _, _) => ClientConfig::new(parse_url("url", url)?, credentials),
        (None, Some(org), Some(tenant)) => ClientConfig::cloud(org, tenant, credentials)
            .map_err(|e| invalid("organization", e.to_string()))?,
        _ => {
            return Err(invalid(
                "url",
                "set either `url` or both `organization` and `tenant`",
            ));
        }
    };

    if let Some(tenant_name) = profile.tenant_name.as_ref().or(profile.tenant.as_ref()) {
        config = config.with_tenant_name(tenant_name.clone());
    }

    match (profile.folder_id, profile.folder_path.as_ref()) {
        (Some(_), Some(_)) => {
            return Err(invalid("folder", "set `folder_id` or `folder_path`, not both"));
        }
        (Some(id), None) => config = config.with_folder(FolderScope::Id(id)),
        (None, Some(path)) => config = config.with_folder(FolderScope::Path(path.clone())),
        (None, None) => {}
    }

    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let retry = RetryPolicy {
        max_retries: defaults.max_retries,
        ..RetryPolicy::default()
    };
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(config.with_transport(
        TransportConfig::default()
            .with_tls(tls)
            .with_timeout(timeout)
            .with_retry(retry),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "cloud"

[defaults]
output = "json"
timeout = 45

[profiles.cloud]
organization = "acme"
tenant = "DefaultTenant"
folder_path = "Finance/Payables"
client_id = "8f0c-app"
client_secret = "from-file"
scopes = ["OR.Jobs", "OR.Queues"]

[profiles.onprem]
url = "https://orchestrator.corp.local"
auth_mode = "password"
tenancy_name = "Ops"
username = "admin"
password = "hunter2"
insecure = true
folder_id = 12
timeout = 5
"#;

    fn write_sample() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        (dir, path)
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("cloud"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 45);
        assert_eq!(cfg.defaults.color, "auto");
        assert_eq!(cfg.profiles.len(), 2);
        assert_eq!(cfg.profiles["onprem"].auth_mode, AuthMode::Password);
        assert_eq!(cfg.profiles["cloud"].auth_mode, AuthMode::ClientCredentials);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.max_retries, 3);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                url: Some("https://orch.local/".into()),
                auth_mode: AuthMode::Token,
                token_env: Some("MY_TOKEN".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let (name, profile) = loaded.profile(None).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.auth_mode, AuthMode::Token);
        assert_eq!(profile.token_env.as_deref(), Some("MY_TOKEN"));
    }

    #[test]
    fn profile_selection() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.profile(None).unwrap().0, "cloud");
        assert_eq!(cfg.profile(Some("onprem")).unwrap().0, "onprem");
        assert!(matches!(
            cfg.profile(Some("nope")),
            Err(ConfigError::UnknownProfile { ref name }) if name == "nope"
        ));
    }

    #[test]
    fn env_beats_plaintext() {
        let profile = Profile {
            client_secret: Some("from-file".into()),
            client_secret_env: Some("ACME_SECRET".into()),
            ..Profile::default()
        };
        let env = |name: &str| (name == "ACME_SECRET").then(|| "from-env".to_owned());

        let secret =
            resolve_secret_with(&profile, "uiorch-test-env", SecretKind::ClientSecret, env)
                .unwrap();
        assert_eq!(secret.expose_secret(), "from-env");

        let fallback = |name: &str| (name == "UIORCH_CLIENT_SECRET").then(|| "generic".to_owned());
        let profile = Profile {
            client_secret: Some("from-file".into()),
            ..Profile::default()
        };
        let secret = resolve_secret_with(
            &profile,
            "uiorch-test-env",
            SecretKind::ClientSecret,
            fallback,
        )
        .unwrap();
        assert_eq!(secret.expose_secret(), "generic");
    }

    #[test]
    fn plaintext_is_last_resort() {
        let profile = Profile {
            token: Some("plain".into()),
            ..Profile::default()
        };
        let secret =
            resolve_secret_with(&profile, "uiorch-test-plain", SecretKind::Token, no_env).unwrap();
        assert_eq!(secret.expose_secret(), "plain");

        let err = resolve_secret_with(
            &Profile::default(),
            "uiorch-test-missing",
            SecretKind::Password,
            no_env,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "no password configured for profile 'uiorch-test-missing'"
        );
    }

    #[test]
    fn cloud_profile_builds_client_config() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();
        let (name, profile) = cfg.profile(None).unwrap();

        let creds = resolve_credentials_with(profile, &name, no_env).unwrap();
        match &creds {
            Credentials::ClientCredentials {
                client_id, scopes, ..
            } => {
                assert_eq!(client_id, "8f0c-app");
                assert_eq!(scopes, &vec!["OR.Jobs".to_owned(), "OR.Queues".to_owned()]);
            }
            other => panic!("expected client credentials, got {}", other.kind()),
        }

        let client = build_client_config(profile, &cfg.defaults, creds).unwrap();
        assert_eq!(
            client.base_url.as_str(),
            "https://cloud.uipath.com/acme/DefaultTenant/orchestrator_/"
        );
        assert_eq!(client.tenant_name.as_deref(), Some("DefaultTenant"));
        assert_eq!(
            client.folder,
            Some(FolderScope::Path("Finance/Payables".into()))
        );
        assert_eq!(client.transport.timeout, Duration::from_secs(45));
    }

    #[test]
    fn onprem_profile_uses_password_flow() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();
        let (name, profile) = cfg.profile(Some("onprem")).unwrap();

        let creds = resolve_credentials_with(profile, &name, no_env).unwrap();
        assert!(matches!(
            creds,
            Credentials::Password { ref tenancy_name, ref username, .. }
                if tenancy_name == "Ops" && username == "admin"
        ));

        let client = build_client_config(profile, &cfg.defaults, creds).unwrap();
        assert_eq!(client.folder, Some(FolderScope::Id(12)));
        assert_eq!(client.transport.timeout, Duration::from_secs(5));
        assert!(matches!(client.transport.tls, TlsMode::DangerAcceptInvalid));
    }

    #[test]
    fn incomplete_profiles_are_rejected() {
        let no_client_id = Profile {
            url: Some("https://orch.local".into()),
            client_secret: Some("s".into()),
            ..Profile::default()
        };
        let err = resolve_credentials_with(&no_client_id, "p", no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "client_id"));

        let both_folders = Profile {
            url: Some("https://orch.local".into()),
            folder_id: Some(1),
            folder_path: Some("Shared".into()),
            ..Profile::default()
        };
        let creds = Credentials::token(SecretString::from("t"));
        let err = build_client_config(&both_folders, &Defaults::default(), creds).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "folder"));

        let nowhere = Profile::default();
        let creds = Credentials::token(SecretString::from("t"));
        assert!(build_client_config(&nowhere, &Defaults::default(), creds).is_err());
    }
}
