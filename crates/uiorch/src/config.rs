//! CLI configuration -- thin wrapper around `uiorch_config` shared types.
//!
//! Re-exports the shared types and layers `GlobalOpts` flag overrides
//! (--url, --token, --folder, ...) on top of the selected profile.

use secrecy::SecretString;

use uiorch_api::{ClientConfig, Credentials};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use uiorch_config::{
    Config, Profile, SecretKind, config_path, load_config, load_config_or_default, store_secret,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Apply flag overrides to a copy of the profile.
///
/// `--folder` is an id when it parses as an integer, otherwise a fully
/// qualified folder path; either replaces both folder fields.
pub fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref url) = global.url {
        profile.url = Some(url.clone());
    }
    if let Some(ref folder) = global.folder {
        match folder.trim().parse::<i64>() {
            Ok(id) => {
                profile.folder_id = Some(id);
                profile.folder_path = None;
            }
            Err(_) => {
                profile.folder_id = None;
                profile.folder_path = Some(folder.clone());
            }
        }
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

/// Build a `ClientConfig` from the config file, the active profile, and
/// the command-line overrides.
///
/// Without a matching profile, `--url` plus `--token` is enough.
pub fn resolve_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.url.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };
    let from_flags_only = !cfg.profiles.contains_key(&profile_name);

    apply_overrides(&mut profile, global);

    let credentials = match global.token {
        Some(ref token) => Credentials::token(SecretString::from(token.clone())),
        None if from_flags_only => {
            return Err(CliError::NoCredentials {
                profile: profile_name,
            });
        }
        None => uiorch_config::resolve_credentials(&profile, &profile_name)?,
    };

    tracing::debug!(
        profile = %profile_name,
        auth = credentials.kind(),
        "resolved client configuration"
    );
    Ok(uiorch_config::build_client_config(
        &profile,
        &cfg.defaults,
        credentials,
    )?)
}
