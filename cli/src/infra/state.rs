//! Infrastructure implementation of the `LeaseStateStore` port.
//!
//! `StateManager` provides async load/save using `tokio::task::spawn_blocking`
//! with atomic write (temp file + rename) so an interrupted save never leaves
//! a truncated lease record behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::LeaseStateStore;
use crate::domain::LeaseRecord;

/// State file manager: implements `LeaseStateStore` for the infra layer.
pub struct StateManager {
    path: PathBuf,
}

impl StateManager {
    /// Create a state manager at `VMLEASE_STATE` or `~/.vmlease/state.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        if let Ok(val) = std::env::var("VMLEASE_STATE") {
            return Ok(Self::with_path(PathBuf::from(val)));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(Self::with_path(home.join(".vmlease").join("state.json")))
    }

    /// Create a state manager with an explicit path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_sync(path: &Path) -> Result<Option<LeaseRecord>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading state file {}", path.display()))?;
        let record = serde_json::from_str(&content)
            .with_context(|| format!("parsing state file {}", path.display()))?;
        Ok(Some(record))
    }

    fn save_sync(path: &Path, record: &LeaseRecord) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(record).context("serializing lease record")?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("setting permissions on {}", temp_path.display()))?;
        }

        std::fs::rename(&temp_path, path)
            .with_context(|| format!("finalizing state file {}", path.display()))
    }

    fn clear_sync(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("removing state file {}", path.display()))?;
        }
        Ok(())
    }
}

impl LeaseStateStore for StateManager {
    async fn load_async(&self) -> Result<Option<LeaseRecord>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::load_sync(&path))
            .await
            .context("state load task panicked")?
    }

    async fn save_async(&self, record: &LeaseRecord) -> Result<()> {
        let path = self.path.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || Self::save_sync(&path, &record))
            .await
            .context("state save task panicked")?
    }

    async fn clear_async(&self) -> Result<()> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::clear_sync(&path))
            .await
            .context("state clear task panicked")?
    }
}
