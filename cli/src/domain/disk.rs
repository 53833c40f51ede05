//! Disk-attachment verification.

use vmlease_common::{HostInfo, parse_disk_descriptor};

/// Whether the disk requested after `prior_disk_count` existing disks is now
/// attached with the requested size.
///
/// Disks are appended in request order, so the newest request lives at index
/// `prior_disk_count`; an older disk of the same size does not count.
#[must_use]
pub fn disk_added(info: &HostInfo, requested_gb: u32, prior_disk_count: usize) -> bool {
    info.disk
        .as_ref()
        .and_then(|disks| disks.get(prior_disk_count))
        .and_then(|descriptor| parse_disk_descriptor(descriptor))
        == Some(requested_gb)
}
