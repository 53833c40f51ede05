//! Request URLs for the pooling service.
//!
//! Pure functions only: no I/O, no async. Every URL is validated here before
//! a request is built.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::domain::error::LeaseError;

/// Characters allowed in a single path segment (RFC 3986 unreserved set).
pub static PATH_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern, cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9._~-]+$").expect("valid regex")
});

/// An explicit `scheme://` prefix on a pool address.
static SCHEME_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern, cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("valid regex")
});

const DEFAULT_SCHEME: &str = "http://";

/// Validates a template name for use as a URL path segment.
///
/// # Errors
///
/// Returns `InvalidTemplateName` if the name is empty or contains characters
/// outside the unreserved set (whitespace, `!`, `&`, `*`, `(`, `)`, `\`, `/`, ...),
/// or is a dot segment (`.` or `..`).
pub fn validate_template_name(name: &str) -> Result<(), LeaseError> {
    if is_path_segment(name) {
        Ok(())
    } else {
        Err(LeaseError::InvalidTemplateName {
            name: name.to_string(),
        })
    }
}

/// Normalizes a pooling-service address, adding `http://` when no scheme is given.
///
/// # Errors
///
/// Returns `InvalidAddress` when the address contains whitespace or control
/// characters, does not parse, has no host, is not http(s), or carries a
/// query string or fragment.
pub fn normalize_base(address: &str) -> Result<Url, LeaseError> {
    let invalid = || LeaseError::InvalidAddress {
        address: address.to_string(),
    };
    if address.is_empty() || address.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid());
    }
    let with_scheme = if SCHEME_PREFIX_RE.is_match(address) {
        address.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{address}")
    };
    let url = Url::parse(&with_scheme).map_err(|_| invalid())?;
    let has_host = url.host_str().is_some_and(|h| !h.is_empty());
    if !has_host
        || !matches!(url.scheme(), "http" | "https")
        || url.cannot_be_a_base()
        || url.query().is_some()
        || url.fragment().is_some()
    {
        return Err(invalid());
    }
    Ok(url)
}

/// `<base>/vm/<template>`: the lease endpoint for a template.
///
/// # Errors
///
/// Returns `InvalidAddress` or `InvalidTemplateName`.
pub fn build_template_url(base: &str, template: &str) -> Result<Url, LeaseError> {
    let url = normalize_base(base)?;
    validate_template_name(template)?;
    Ok(with_segments(url, &["vm", template]))
}

/// `<base>/vm/<hostname>`: status, tagging and deletion of a leased VM.
///
/// # Errors
///
/// Returns `InvalidAddress` or `InvalidHostname`.
pub fn build_vm_url(base: &str, vm_hostname: &str) -> Result<Url, LeaseError> {
    let url = normalize_base(base)?;
    validate_hostname(vm_hostname)?;
    Ok(with_segments(url, &["vm", vm_hostname]))
}

/// `<base>/vm/<hostname>/disk/<size_gb>`: attach an extra disk.
///
/// # Errors
///
/// Returns `InvalidAddress`, `InvalidHostname`, or `InvalidDiskSize` for a zero size.
pub fn build_disk_url(base: &str, vm_hostname: &str, size_gb: u32) -> Result<Url, LeaseError> {
    let url = normalize_base(base)?;
    validate_hostname(vm_hostname)?;
    if size_gb == 0 {
        return Err(LeaseError::InvalidDiskSize {
            hostname: vm_hostname.to_string(),
        });
    }
    let size = size_gb.to_string();
    Ok(with_segments(url, &["vm", vm_hostname, "disk", &size]))
}

fn validate_hostname(name: &str) -> Result<(), LeaseError> {
    if is_path_segment(name) {
        Ok(())
    } else {
        Err(LeaseError::InvalidHostname {
            name: name.to_string(),
        })
    }
}

/// Dot segments would be folded away by URL normalization.
fn is_path_segment(name: &str) -> bool {
    PATH_SEGMENT_RE.is_match(name) && name != "." && name != ".."
}

fn with_segments(mut url: Url, segments: &[&str]) -> Url {
    // normalize_base rejects cannot-be-a-base URLs, so this always succeeds.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
