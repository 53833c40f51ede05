//! JSON output helpers.
//!
//! Provides the renderer used by `--json` and the error-object formatter
//! used when a command fails.

use anyhow::{Context, Result};
use serde_json::json;

use crate::domain::LeaseRecord;

/// Renders domain types as pretty-printed JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Render the lease record produced by `provision`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_record(record: &LeaseRecord) -> Result<()> {
        print_json(&serde_json::to_value(record).context("serializing lease record")?)
    }

    /// Render the stored lease state; `{"leased": false}` when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_status(record: Option<&LeaseRecord>) -> Result<()> {
        let value = match record {
            Some(record) => json!({
                "leased": record.has_leases(),
                "record": record,
            }),
            None => json!({ "leased": false }),
        };
        print_json(&value)
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_released(released: usize) -> Result<()> {
        print_json(&json!({ "released": released }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(version: &str) -> Result<()> {
        print_json(&json!({ "version": version }))
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Stable machine-readable code for an error, based on its domain type.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    use crate::domain::{ConfigError, InventoryError, LeaseError};

    if let Some(e) = err.downcast_ref::<LeaseError>() {
        return match e {
            LeaseError::InvalidAddress { .. } => "INVALID_ADDRESS",
            LeaseError::InvalidTemplateName { .. } => "INVALID_TEMPLATE",
            LeaseError::InvalidHostname { .. } => "INVALID_HOSTNAME",
            LeaseError::InvalidDiskSize { .. } => "INVALID_DISK_SIZE",
            LeaseError::ProvisioningFailed { .. } => "PROVISIONING_FAILED",
            LeaseError::DiskNotAttached { .. } => "DISK_NOT_ATTACHED",
            LeaseError::TeardownFailed { .. } => "TEARDOWN_FAILED",
        };
    }
    if err.downcast_ref::<InventoryError>().is_some() {
        return "INVALID_INVENTORY";
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return "INVALID_CONFIG";
    }
    "COMMAND_FAILED"
}
