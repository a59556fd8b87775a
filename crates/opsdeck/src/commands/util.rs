//! Shared helpers for command handlers.

use chrono::{DateTime, Utc};

use opsdeck_core::{Controller, EntityId};

use crate::error::CliError;

/// Resolve a user identifier (ID or username) via snapshot lookup.
pub fn resolve_user_id(controller: &Controller, identifier: &str) -> Result<EntityId, CliError> {
    let snap = controller.users_snapshot();
    for user in snap.iter() {
        if user.id.as_str() == identifier || user.username == identifier {
            return Ok(user.id.clone());
        }
    }
    Err(CliError::NotFound {
        resource_type: "user".into(),
        identifier: identifier.into(),
        list_command: "users list".into(),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse an RFC 3339 timestamp flag.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CliError::Validation {
            field: field.into(),
            reason: format!("expected RFC 3339 timestamp: {e}"),
        })
}

/// Format an optional timestamp for table cells.
pub fn fmt_time(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
