//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde_json::Value;
use url::Url;

use crate::domain::{Credentials, LeaseConfig, LeaseRecord};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Header carrying the pool token on authenticated requests.
pub const AUTH_TOKEN_HEADER: &str = "X-AUTH-TOKEN";

// ── Value Types ───────────────────────────────────────────────────────────────

/// HTTP verbs the pool API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// One request to the pooling service.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// Sent as `X-AUTH-TOKEN` when present.
    pub token: Option<String>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl PoolRequest {
    #[must_use]
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            token: None,
            body: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_owned);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

// ── Pool Transport Port ───────────────────────────────────────────────────────

/// Sends requests to the pooling service and returns the parsed JSON body.
///
/// A response whose body is not JSON, or a connection failure, is an error.
/// A JSON body reporting `"ok": false` is *not* an error at this level; the
/// caller decides what an unsuccessful answer means.
#[allow(async_fn_in_trait)]
pub trait PoolTransport {
    async fn send(&self, request: PoolRequest) -> Result<Value>;
}

// ── Credential Port ───────────────────────────────────────────────────────────

/// Supplies the pool token, typically from a credentials file.
pub trait CredentialStore {
    /// Load credentials. May fail for a missing or malformed source.
    fn load(&self) -> Result<Credentials>;
    /// Human-readable location of the credentials, used in warnings.
    fn location(&self) -> String;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Pause Port ────────────────────────────────────────────────────────────────

/// Suspension between retries and status polls. Tests substitute a no-op.
#[allow(async_fn_in_trait)]
pub trait Pause {
    async fn pause(&self, duration: Duration);
}

// ── State and Config Ports ────────────────────────────────────────────────────

/// Persists the lease record between `provision` and `cleanup`.
#[allow(async_fn_in_trait)]
pub trait LeaseStateStore {
    /// Load the current lease record, returning `None` if none exists.
    async fn load_async(&self) -> Result<Option<LeaseRecord>>;
    /// Persist the given lease record.
    async fn save_async(&self, record: &LeaseRecord) -> Result<()>;
    /// Remove the lease record.
    async fn clear_async(&self) -> Result<()>;
}

/// Loads `LeaseConfig`.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<LeaseConfig>;
    /// Path of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
