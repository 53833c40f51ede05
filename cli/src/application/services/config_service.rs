//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::LeaseConfig;

/// Values given on the command line that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub pooling_api: Option<String>,
    pub project: Option<String>,
    pub max_rounds: Option<u32>,
}

/// Load configuration, apply overrides and validate the result.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or the merged
/// configuration is invalid.
pub fn load_config(store: &impl ConfigStore, overrides: &ConfigOverrides) -> Result<LeaseConfig> {
    let mut config = store.load()?;
    apply_overrides(&mut config, overrides);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut LeaseConfig, overrides: &ConfigOverrides) {
    if let Some(api) = &overrides.pooling_api {
        config.pooling_api.clone_from(api);
    }
    if let Some(project) = &overrides.project {
        config.run.project = Some(project.clone());
    }
    if let Some(rounds) = overrides.max_rounds {
        config.max_rounds = rounds;
    }
}
