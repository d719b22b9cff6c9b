//! Config subcommand handlers.

use std::fmt::Write as _;
use std::io::Read;

use dialoguer::Password;
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, SecretKindArg};
use crate::config::{self, Config, SecretKind};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

const REDACTED: &str = "\"****\"";

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "max_retries = {}", cfg.defaults.max_retries);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");

        let plain = [
            ("url", p.url.as_deref()),
            ("organization", p.organization.as_deref()),
            ("tenant", p.tenant.as_deref()),
            ("tenant_name", p.tenant_name.as_deref()),
            ("folder_path", p.folder_path.as_deref()),
            ("client_id", p.client_id.as_deref()),
            ("client_secret_env", p.client_secret_env.as_deref()),
            ("token_url", p.token_url.as_deref()),
            ("refresh_token_env", p.refresh_token_env.as_deref()),
            ("tenancy_name", p.tenancy_name.as_deref()),
            ("username", p.username.as_deref()),
            ("password_env", p.password_env.as_deref()),
            ("token_env", p.token_env.as_deref()),
        ];
        let secrets = [
            ("client_secret", p.client_secret.is_some()),
            ("refresh_token", p.refresh_token.is_some()),
            ("password", p.password.is_some()),
            ("token", p.token.is_some()),
        ];

        let mode = serde_json::to_value(p.auth_mode)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        let _ = writeln!(out, "auth_mode = \"{mode}\"");
        for (key, value) in plain {
            if let Some(value) = value {
                let _ = writeln!(out, "{key} = \"{value}\"");
            }
        }
        for (key, present) in secrets {
            if present {
                let _ = writeln!(out, "{key} = {REDACTED}");
            }
        }
        if let Some(id) = p.folder_id {
            let _ = writeln!(out, "folder_id = {id}");
        }
        if !p.scopes.is_empty() {
            let _ = writeln!(out, "scopes = {:?}", p.scopes);
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

impl From<SecretKindArg> for SecretKind {
    fn from(kind: SecretKindArg) -> Self {
        match kind {
            SecretKindArg::ClientSecret => Self::ClientSecret,
            SecretKindArg::RefreshToken => Self::RefreshToken,
            SecretKindArg::Password => Self::Password,
            SecretKindArg::Token => Self::Token,
        }
    }
}

fn read_secret(kind: SecretKind, from_stdin: bool) -> Result<SecretString, CliError> {
    let secret = if from_stdin {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf.trim_end_matches(['\r', '\n']).to_owned()
    } else {
        Password::new()
            .with_prompt(format!("New {kind}"))
            .interact()
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?
    };

    if secret.is_empty() {
        return Err(CliError::Validation {
            field: kind.keyring_suffix().into(),
            reason: "secret cannot be empty".into(),
        });
    }
    Ok(SecretString::from(secret))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            output::print_output(format_config_redacted(&cfg).trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetSecret { kind, stdin } => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let kind = SecretKind::from(kind);

            let secret = read_secret(kind, stdin)?;
            config::store_secret(&profile_name, kind, &secret)?;

            if !global.quiet {
                eprintln!("Stored {kind} for profile '{profile_name}' in the system keyring");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;

    #[test]
    fn secrets_are_redacted() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                organization: Some("acme".into()),
                tenant: Some("Prod".into()),
                client_id: Some("app-id".into()),
                client_secret: Some("super-secret".into()),
                folder_id: Some(4),
                ..Profile::default()
            },
        );

        let out = format_config_redacted(&cfg);
        assert!(out.contains("[profiles.prod]"));
        assert!(out.contains("auth_mode = \"client_credentials\""));
        assert!(out.contains("client_id = \"app-id\""));
        assert!(out.contains("client_secret = \"****\""));
        assert!(out.contains("folder_id = 4"));
        assert!(!out.contains("super-secret"));
    }
}
