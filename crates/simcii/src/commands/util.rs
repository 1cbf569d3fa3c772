//! Shared helpers for command handlers.

use simcii_core::{CoreError, DeviceId};

use crate::error::CliError;

/// Parse a device ID argument.
pub fn parse_device_id(raw: &str) -> Result<DeviceId, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "id".into(),
        reason: format!("expected a numeric device ID, got '{raw}'"),
    })
}

/// Treat a 404 from the inventory service as "device not found".
pub fn device_error(err: CoreError, id: DeviceId) -> CliError {
    match err {
        CoreError::Http { status: 404, .. } => CoreError::DeviceNotFound { id }.into(),
        other => other.into(),
    }
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
