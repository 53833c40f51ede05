//! Disk descriptors as recorded by the pooling service: `"+<size>gb"`.

/// Parse the size in GB out of a descriptor such as `"+16gb"`.
///
/// The leading `+` and the unit suffix are optional and the unit is matched
/// case-insensitively. Returns `None` for anything that is not a whole number.
#[must_use]
pub fn parse_disk_descriptor(descriptor: &str) -> Option<u32> {
    let trimmed = descriptor.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = match unsigned
        .len()
        .checked_sub(2)
        .and_then(|at| unsigned.get(at..).map(|unit| (at, unit)))
    {
        Some((at, unit)) if unit.eq_ignore_ascii_case("gb") => &unsigned[..at],
        _ => unsigned,
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Render a size the way the service records it.
#[must_use]
pub fn disk_descriptor(size_gb: u32) -> String {
    format!("+{size_gb}gb")
}
