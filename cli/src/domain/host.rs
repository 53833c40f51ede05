//! Host records: one leased (or to-be-leased) VM per inventory entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// String-to-string metadata attached to a leased VM.
pub type Tags = BTreeMap<String, String>;

/// Where a host is in the leasing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseState {
    /// Requested, no VM bound yet.
    Pending,
    /// Bound to a VM the pool handed out.
    Leased,
}

/// One machine from the inventory.
///
/// `vmhostname` is `Some` exactly when the pool has handed a VM to this host;
/// [`Host::bind`] and [`Host::release`] are the only transitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Host {
    /// Inventory name, e.g. `"agent-1"`.
    pub name: String,
    /// Template requested from the pool. A leading folder path is ignored.
    pub template: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Per-host tags; these win over run-level and built-in tags.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: Tags,
    /// Size in GB of an extra disk to attach after leasing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmhostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Host {
    #[must_use]
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    #[must_use]
    pub fn with_disk(mut self, size_gb: u32) -> Self {
        self.disk_size = Some(size_gb);
        self
    }

    #[must_use]
    pub fn state(&self) -> LeaseState {
        if self.vmhostname.is_some() {
            LeaseState::Leased
        } else {
            LeaseState::Pending
        }
    }

    #[must_use]
    pub fn is_leased(&self) -> bool {
        self.state() == LeaseState::Leased
    }

    /// The template name sent to the pool: `"vsphere/centos-7"` leases `"centos-7"`.
    #[must_use]
    pub fn lease_template(&self) -> &str {
        self.template
            .rsplit('/')
            .next()
            .unwrap_or(self.template.as_str())
    }

    /// `<vmhostname>.<domain>` when the pool reported a domain.
    #[must_use]
    pub fn fqdn(&self) -> Option<String> {
        let hostname = self.vmhostname.as_deref()?;
        Some(match self.domain.as_deref() {
            Some(domain) => format!("{hostname}.{domain}"),
            None => hostname.to_string(),
        })
    }

    /// Record the VM the pool allocated for this host.
    pub fn bind(&mut self, hostname: impl Into<String>, domain: Option<String>) {
        self.vmhostname = Some(hostname.into());
        self.domain = domain;
    }

    /// Forget the VM after it was handed back.
    pub fn release(&mut self) {
        self.vmhostname = None;
        self.domain = None;
    }
}
