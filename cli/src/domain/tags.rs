//! Tag merging for leased VMs.

use crate::domain::config::RunOptions;
use crate::domain::host::{Host, Tags};

/// Built-in tag identifying the client that leased the VM.
pub const VERSION_TAG: &str = "product_version";

/// Version string recorded under [`VERSION_TAG`].
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Merge the tags for `host`, later layers overriding earlier ones:
///
/// 1. `product_version`
/// 2. run-level options (`project`, `department`, `created_by`,
///    `jenkins_build_url`) plus the host's `name` and `roles`
/// 3. the host's own `tags`
///
/// Unset run options are left out rather than sent as empty strings.
#[must_use]
pub fn merge_tags(host: &Host, run: &RunOptions) -> Tags {
    let mut tags = Tags::new();
    tags.insert(VERSION_TAG.to_string(), CLIENT_VERSION.to_string());

    let run_level = [
        ("project", run.project.as_deref()),
        ("department", run.department.as_deref()),
        ("created_by", run.created_by.as_deref()),
        ("jenkins_build_url", run.jenkins_build_url.as_deref()),
    ];
    for (key, value) in run_level {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            tags.insert(key.to_string(), value.to_string());
        }
    }
    if !host.name.is_empty() {
        tags.insert("name".to_string(), host.name.clone());
    }
    if !host.roles.is_empty() {
        tags.insert("roles".to_string(), host.roles.join(", "));
    }

    tags.extend(host.tags.iter().map(|(k, v)| (k.clone(), v.clone())));
    tags
}
