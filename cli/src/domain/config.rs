//! Domain types and validators for vmlease configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::url::normalize_base;

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const DEFAULT_MAX_ROUNDS: u32 = 5;
pub const DEFAULT_ROUND_BACKOFF_SECS: u64 = 5;
pub const DEFAULT_DISK_POLL_ATTEMPTS: u32 = 20;
pub const DEFAULT_DISK_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.vmlease/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LeaseConfig {
    /// Base address of the pooling service, e.g. `vmpooler.example.net`.
    pub pooling_api: String,
    /// Lease rounds before giving up on outstanding templates.
    pub max_rounds: u32,
    /// Pause between lease rounds.
    pub round_backoff_secs: u64,
    /// Status checks while waiting for an extra disk.
    pub disk_poll_attempts: u32,
    pub disk_poll_interval_secs: u64,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
    /// Credentials file holding the pool token. `None` means `~/.fog`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<PathBuf>,
    /// Run-level metadata copied into every VM's tags.
    pub run: RunOptions,
}

impl Default for LeaseConfig {
    fn default() -> Self {
        Self {
            pooling_api: String::new(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            round_backoff_secs: DEFAULT_ROUND_BACKOFF_SECS,
            disk_poll_attempts: DEFAULT_DISK_POLL_ATTEMPTS,
            disk_poll_interval_secs: DEFAULT_DISK_POLL_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            credentials_file: None,
            run: RunOptions::default(),
        }
    }
}

impl LeaseConfig {
    #[must_use]
    pub fn round_backoff(&self) -> Duration {
        Duration::from_secs(self.round_backoff_secs)
    }

    #[must_use]
    pub fn disk_poll_interval(&self) -> Duration {
        Duration::from_secs(self.disk_poll_interval_secs)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validates the settings the leasing protocol depends on.
    ///
    /// # Errors
    ///
    /// Returns an error if `pooling_api` is missing or malformed, or if a
    /// counter that bounds retries is zero.
    pub fn validate(&self) -> Result<()> {
        if self.pooling_api.is_empty() {
            return Err(ConfigError::MissingPoolingApi.into());
        }
        normalize_base(&self.pooling_api)?;
        for (key, value) in [
            ("max_rounds", self.max_rounds),
            ("disk_poll_attempts", self.disk_poll_attempts),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    expected: "an integer greater than zero".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Run-level options recorded as tags on every leased VM.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jenkins_build_url: Option<String>,
}

// ── Unit tests ───────────────────────────────────────────────────────────────
