//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::fmt;

use thiserror::Error;

// ── Lease errors ──────────────────────────────────────────────────────────────

/// Errors raised by the leasing protocol.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeaseError {
    #[error("Invalid pooling service address: '{address}'")]
    InvalidAddress { address: String },

    #[error(
        "Invalid template name '{name}': only letters, digits, '-', '.', '_' and '~' are allowed"
    )]
    InvalidTemplateName { name: String },

    #[error("Invalid VM hostname '{name}'")]
    InvalidHostname { name: String },

    #[error("Invalid disk size for {hostname}: must be an integer greater than zero")]
    InvalidDiskSize { hostname: String },

    #[error("requested VM templates [{}] not available", .templates.join(", "))]
    ProvisioningFailed { templates: Vec<String> },

    #[error("could not verify a {size_gb}GB disk was added to {hostname} after {attempts} checks")]
    DiskNotAttached {
        hostname: String,
        size_gb: u32,
        attempts: u32,
    },

    #[error(
        "failed to hand {} VM(s) back to the pool: {}",
        .failures.len(),
        .failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    TeardownFailed { failures: Vec<TeardownFailure> },
}

/// One VM that could not be released during teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownFailure {
    pub hostname: String,
    pub reason: String,
}

impl fmt::Display for TeardownFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.hostname, self.reason)
    }
}

// ── Inventory errors ──────────────────────────────────────────────────────────

/// Errors in a host inventory before any request is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Inventory contains no hosts.")]
    Empty,

    #[error("Host '{0}' has no template. Every host needs a template to lease.")]
    MissingTemplate(String),

    #[error("Host name '{0}' appears more than once in the inventory.")]
    DuplicateName(String),

    #[error(
        "Host '{0}' already names a VM. Inventories list hosts to lease; \
         leased VMs are only recorded by `vmlease provision`."
    )]
    AlreadyLeased(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No pooling service configured. Set pooling_api in the config file or pass --pooling-api.")]
    MissingPoolingApi,

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}
