//! Loading host inventories from YAML files.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{Host, Inventory};

/// Read and validate the inventory at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the inventory
/// is invalid (no hosts, a host without template or with a VM already
/// assigned, duplicate names).
pub fn load_inventory(path: &Path) -> Result<Vec<Host>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read inventory {}", path.display()))?;
    let inventory: Inventory = serde_yaml::from_str(&content)
        .with_context(|| format!("cannot parse inventory {}", path.display()))?;
    inventory
        .validate()
        .with_context(|| format!("invalid inventory {}", path.display()))?;
    Ok(inventory.hosts)
}
