//! CLI-side profile resolution: config file + environment + flag overrides.

pub use opsdeck_config::{
    Config, Defaults, Profile, active_profile_name, config_path, load_config_or_default,
    resolve_credentials, save_config, store_password,
};

use secrecy::SecretString;

use opsdeck_core::{AuthCredentials, ServerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `ServerConfig` from the config file, profile, and CLI overrides.
pub fn build_server_config(global: &GlobalOpts) -> Result<ServerConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global.profile.as_deref(), &cfg);

    // If a profile exists, use it with CLI flag overrides.
    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global);
    }

    // No profile found -- try to build from CLI flags / env vars alone.
    let url_str = global.server.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let username = global
        .username
        .clone()
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.clone(),
        })?;
    let password = std::env::var("OPSDECK_PASSWORD")
        .map(SecretString::from)
        .map_err(|_| CliError::NoCredentials {
            profile: profile_name,
        })?;

    Ok(ServerConfig {
        url,
        auth: AuthCredentials::Credentials { username, password },
        tls: tls_from_flags(global, None),
        timeout: std::time::Duration::from_secs(global.timeout),
        refresh_interval_secs: 0,
    })
}

/// Resolve a profile into a `ServerConfig`, applying CLI flag overrides.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<ServerConfig, CliError> {
    let url_str = global.server.as_deref().unwrap_or(&profile.server);
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let (mut username, password) = resolve_credentials(profile, profile_name)?;
    if let Some(override_user) = &global.username {
        username.clone_from(override_user);
    }

    Ok(ServerConfig {
        url,
        auth: AuthCredentials::Credentials { username, password },
        tls: tls_from_flags(global, profile.insecure),
        timeout: std::time::Duration::from_secs(
            profile.timeout.unwrap_or(global.timeout),
        ),
        refresh_interval_secs: 0,
    })
}

fn tls_from_flags(global: &GlobalOpts, profile_insecure: Option<bool>) -> TlsVerification {
    if global.insecure || profile_insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    }
}
