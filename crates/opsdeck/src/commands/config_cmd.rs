//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Confirm, Input, Password, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

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
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
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
        if let Some(interval) = p.refresh_interval {
            let _ = writeln!(out, "refresh_interval = {interval}");
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            output::print_output(&format_config_redacted(&cfg), global.quiet);
            Ok(())
        }
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::SetPassword { profile } => set_password(profile, global),
    }
}

/// Interactively create or update a profile.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let server: String = Input::new()
        .with_prompt("Server URL")
        .with_initial_text(
            cfg.profiles
                .get(&name)
                .map(|p| p.server.clone())
                .unwrap_or_default(),
        )
        .interact_text()
        .map_err(prompt_err)?;

    // Reject an invalid URL before writing anything.
    let _: url::Url = server.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server}"),
    })?;

    let username: String = Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(prompt_err)?;

    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(prompt_err)?;

    if username.is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }

    // Prefer keyring storage; fall back to plaintext only on request.
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where should the password live?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let plaintext_password = if selection == 0 {
        config::store_password(&name, &password)?;
        None
    } else {
        Some(password)
    };

    let insecure = Confirm::new()
        .with_prompt("Accept self-signed TLS certificates?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;

    cfg.profiles.insert(
        name.clone(),
        Profile {
            server,
            username: Some(username),
            password: plaintext_password,
            password_env: None,
            ca_cert: None,
            insecure: insecure.then_some(true),
            timeout: None,
            refresh_interval: None,
        },
    );

    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(name.clone());
    }

    config::save_config(&cfg)?;
    output::print_success(
        &format!("Profile '{name}' saved to {}", config::config_path().display()),
        &global.color,
        global.quiet,
    );
    Ok(())
}

/// Store a (new) password in the system keyring for a profile.
fn set_password(profile: Option<String>, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let name = profile
        .or_else(|| global.profile.clone())
        .unwrap_or_else(|| config::active_profile_name(None, &cfg));

    if !cfg.profiles.contains_key(&name) {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name,
            available: available.join(", "),
        });
    }

    let password = Password::new()
        .with_prompt(format!("New password for profile '{name}'"))
        .interact()
        .map_err(prompt_err)?;

    config::store_password(&name, &password)?;
    output::print_success("Password stored in keyring", &global.color, global.quiet);
    Ok(())
}
