//! Shared configuration for the opsdeck CLI and TUI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `opsdeck_core::ServerConfig`. Both binaries depend
//! on this crate -- the CLI adds flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use opsdeck_core::{AuthCredentials, ServerConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

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

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
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

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
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

/// A named server profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "https://admin.example.com").
    pub server: String,

    /// Username for session auth.
    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Full refresh interval in seconds (TUI).
    pub refresh_interval: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "opsdeck", "opsdeck").map_or_else(
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
    p.push("opsdeck");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("OPSDECK_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve session credentials (username + password).
///
/// Password resolution order: profile's `password_env` env var,
/// `OPSDECK_PASSWORD`, the system keyring, then plaintext in the config.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("OPSDECK_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 1. Profile-named env var
    if let Some(ref env_name) = profile.password_env {
        if let Ok(pw) = std::env::var(env_name) {
            return Ok((username, SecretString::from(pw)));
        }
    }

    // 2. Well-known env var
    if let Ok(pw) = std::env::var("OPSDECK_PASSWORD") {
        return Ok((username, SecretString::from(pw)));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new("opsdeck", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok((username, SecretString::from(pw)));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a password in the system keyring for a profile.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new("opsdeck", &format!("{profile_name}/password")).map_err(
        |e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        },
    )?;
    entry
        .set_password(password)
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── Profile translation ─────────────────────────────────────────────

/// Build a `ServerConfig` from a profile -- no CLI flag overrides.
///
/// Suitable for the TUI and other non-CLI consumers.
pub fn profile_to_server_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ServerConfig, ConfigError> {
    let url: url::Url = profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })?;

    let (username, password) = resolve_credentials(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(30));

    Ok(ServerConfig {
        url,
        auth: AuthCredentials::Credentials { username, password },
        tls,
        timeout,
        refresh_interval_secs: profile.refresh_interval.unwrap_or(60),
    })
}

/// Pick the active profile name: explicit choice, else the config's
/// default, else "default".
pub fn active_profile_name(explicit: Option<&str>, cfg: &Config) -> String {
    explicit
        .map(ToOwned::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(server: &str) -> Profile {
        Profile {
            server: server.into(),
            username: Some("admin".into()),
            password: Some("hunter2".into()),
            password_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            refresh_interval: None,
        }
    }

    #[test]
    fn plaintext_password_resolves_last() {
        let p = profile("https://admin.example.com");
        let (user, _pw) = resolve_credentials(&p, "default").unwrap();
        assert_eq!(user, "admin");
    }

    #[test]
    fn missing_username_is_an_error() {
        let mut p = profile("https://admin.example.com");
        p.username = None;
        // Only meaningful when the env var is absent.
        if std::env::var("OPSDECK_USERNAME").is_err() {
            assert!(matches!(
                resolve_credentials(&p, "default"),
                Err(ConfigError::NoCredentials { .. })
            ));
        }
    }

    #[test]
    fn invalid_url_is_rejected() {
        let p = profile("not a url");
        assert!(matches!(
            profile_to_server_config(&p, "default"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn profile_translates_to_server_config() {
        let p = profile("https://admin.example.com");
        let cfg = profile_to_server_config(&p, "default").unwrap();
        assert_eq!(cfg.url.as_str(), "https://admin.example.com/");
        assert_eq!(cfg.refresh_interval_secs, 60);
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn active_profile_prefers_explicit_choice() {
        let cfg = Config::default();
        assert_eq!(active_profile_name(Some("staging"), &cfg), "staging");
        assert_eq!(active_profile_name(None, &cfg), "default");
    }
}
