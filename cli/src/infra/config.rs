//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::LeaseConfig;

/// Reads `LeaseConfig` from a YAML file on disk.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<LeaseConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(LeaseConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(LeaseConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("VMLEASE_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".vmlease").join("config.yaml"))
    }
}
