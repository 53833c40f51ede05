use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A VM record as the pooling service reports it, either under a template
/// key (lease responses) or under a hostname key (status responses).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostInfo {
    /// Hostname(s) allocated for the template. Absent in status responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<Hostnames>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Disk descriptors (`"+16gb"`) in the order they were attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<Vec<String>>,
}

impl HostInfo {
    /// First non-empty hostname in the record.
    #[must_use]
    pub fn first_hostname(&self) -> Option<&str> {
        self.hostname.as_ref().and_then(Hostnames::first)
    }

    /// Number of disks already attached.
    #[must_use]
    pub fn disk_count(&self) -> usize {
        self.disk.as_ref().map_or(0, Vec::len)
    }
}

/// The service answers with a bare string for a single VM and an array when
/// several VMs of the same template were allocated in one call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Hostnames {
    One(String),
    Many(Vec<String>),
}

impl Hostnames {
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(name) => Some(name.as_str()).filter(|n| !n.is_empty()),
            Self::Many(names) => names.iter().map(String::as_str).find(|n| !n.is_empty()),
        }
    }
}

/// Body of `PUT /vm/{hostname}` when tagging a VM.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagUpdate {
    pub tags: BTreeMap<String, String>,
}
