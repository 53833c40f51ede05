//! Host inventories and the lease record persisted between runs.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::InventoryError;
use crate::domain::host::Host;

/// The hosts a run wants leased, as read from a YAML inventory file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inventory {
    pub hosts: Vec<Host>,
}

impl Inventory {
    /// Checks the inventory before any request is made.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no hosts, a host has no template or
    /// already carries lease fields, or two hosts share a name.
    pub fn validate(&self) -> Result<(), InventoryError> {
        if self.hosts.is_empty() {
            return Err(InventoryError::Empty);
        }
        let mut seen = HashSet::new();
        for host in &self.hosts {
            if host.template.trim().is_empty() {
                return Err(InventoryError::MissingTemplate(host.name.clone()));
            }
            if host.vmhostname.is_some() || host.domain.is_some() {
                return Err(InventoryError::AlreadyLeased(host.name.clone()));
            }
            if !seen.insert(host.name.as_str()) {
                return Err(InventoryError::DuplicateName(host.name.clone()));
            }
        }
        Ok(())
    }
}

/// What `provision` leased, kept so `cleanup` can run in a later process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaseRecord {
    /// Pool the VMs were leased from; cleanup must go back to the same one.
    pub pooling_api: String,
    pub created_at: DateTime<Utc>,
    pub hosts: Vec<Host>,
}

impl LeaseRecord {
    #[must_use]
    pub fn new(pooling_api: impl Into<String>, hosts: Vec<Host>) -> Self {
        Self {
            pooling_api: pooling_api.into(),
            created_at: Utc::now(),
            hosts,
        }
    }

    /// Hosts still holding a VM.
    pub fn leased(&self) -> impl Iterator<Item = &Host> {
        self.hosts.iter().filter(|h| h.is_leased())
    }

    #[must_use]
    pub fn has_leases(&self) -> bool {
        self.leased().next().is_some()
    }
}
