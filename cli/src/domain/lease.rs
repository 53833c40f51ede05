//! Lease bookkeeping: which templates are still outstanding and what a
//! single lease call produced.
//!
//! Pure functions only: no I/O, no async.

use std::collections::BTreeMap;

use serde_json::Value;
use vmlease_common::{HostInfo, response_ok, top_level_domain};

use crate::domain::host::Host;

/// A VM the pool handed out for one lease call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeasedVm {
    pub hostname: String,
    pub domain: Option<String>,
    /// Disks already attached when the VM was leased.
    pub disk_count: usize,
}

/// Result of one lease call for one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaseOutcome {
    Leased(LeasedVm),
    /// No usable hostname this round; the template stays outstanding.
    Failed,
}

/// Interpret a lease response for `template`.
///
/// A response that is not `ok`, has no entry for the template, or whose entry
/// carries no non-empty hostname is a `Failed` outcome, never an error.
#[must_use]
pub fn parse_lease_response(response: &Value, template: &str) -> LeaseOutcome {
    if !response_ok(response) {
        return LeaseOutcome::Failed;
    }
    let Some(entry) = response.get(template).filter(|e| e.is_object()) else {
        return LeaseOutcome::Failed;
    };
    let Ok(info) = serde_json::from_value::<HostInfo>(entry.clone()) else {
        return LeaseOutcome::Failed;
    };
    let Some(hostname) = info.first_hostname() else {
        return LeaseOutcome::Failed;
    };
    let domain = info
        .domain
        .clone()
        .filter(|d| !d.is_empty())
        .or_else(|| top_level_domain(response).map(str::to_owned));
    LeaseOutcome::Leased(LeasedVm {
        hostname: hostname.to_string(),
        domain,
        disk_count: info.disk_count(),
    })
}

/// Templates that still need a lease, with how many hosts await each one.
///
/// Only ever shrinks: [`ProvisionRequest::narrow`] drops templates whose hosts
/// are all leased and never adds new ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionRequest {
    outstanding: BTreeMap<String, usize>,
}

impl ProvisionRequest {
    /// Every distinct template among the hosts that are not leased yet.
    #[must_use]
    pub fn from_hosts(hosts: &[Host]) -> Self {
        let mut outstanding = BTreeMap::new();
        for host in hosts.iter().filter(|h| !h.is_leased()) {
            *outstanding
                .entry(host.lease_template().to_string())
                .or_insert(0) += 1;
        }
        Self { outstanding }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }

    /// Outstanding templates, deduplicated and sorted.
    #[must_use]
    pub fn templates(&self) -> Vec<String> {
        self.outstanding.keys().cloned().collect()
    }

    /// Number of hosts still waiting for `template`.
    #[must_use]
    pub fn awaiting(&self, template: &str) -> usize {
        self.outstanding.get(template).copied().unwrap_or(0)
    }

    /// Total lease calls the next round will issue.
    #[must_use]
    pub fn pending_calls(&self) -> usize {
        self.outstanding.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.outstanding.iter().map(|(t, n)| (t.as_str(), *n))
    }

    /// Recompute from the hosts after a round, keeping only templates that
    /// were already outstanding.
    pub fn narrow(&mut self, hosts: &[Host]) {
        let current = Self::from_hosts(hosts);
        self.outstanding = self
            .outstanding
            .iter()
            .filter_map(|(template, awaiting)| {
                let still = current.awaiting(template).min(*awaiting);
                (still > 0).then(|| (template.clone(), still))
            })
            .collect();
    }
}
