//! Infrastructure implementation of the `CredentialStore` port.
//!
//! Reads the pool token from a fog-style YAML file:
//!
//! ```yaml
//! :default:
//!   :vmpooler_token: abc123
//! ```
//!
//! Keys are accepted with or without the leading colon.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_yaml::Value;

use crate::application::ports::CredentialStore;
use crate::domain::Credentials;

/// Why a credentials file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("file not found")]
    NotFound,

    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML: {0}")]
    InvalidSyntax(#[from] serde_yaml::Error),
}

/// Loads credentials from `~/.fog` or a configured path.
pub struct FogCredentialStore {
    path: PathBuf,
}

impl FogCredentialStore {
    /// Use `path` when given, otherwise `~/.fog`. A leading `~/` is expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory is needed but cannot be
    /// determined.
    pub fn new(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => expand_home(p)?,
            None => home()?.join(".fog"),
        };
        Ok(Self::with_path(path))
    }

    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<Credentials, CredentialError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CredentialError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Credentials::default());
        }
        let doc: Value = serde_yaml::from_str(&content)?;
        let token = lookup(&doc, "default")
            .and_then(|section| lookup(section, "vmpooler_token"))
            .and_then(scalar_to_string);
        Ok(token.map(Credentials::with_token).unwrap_or_default())
    }
}

impl CredentialStore for FogCredentialStore {
    fn load(&self) -> Result<Credentials> {
        Ok(self.read()?)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value
        .get(format!(":{key}").as_str())
        .or_else(|| value.get(key))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
}

fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(home()?.join(rest)),
        Err(_) => Ok(path.to_path_buf()),
    }
}
