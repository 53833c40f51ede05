//! Helpers for the `{ "ok": ..., ... }` envelope every pool response uses.

use serde_json::Value;

/// Whether the response reports success.
///
/// Older pool versions send `"ok": "true"` as a string, so both forms count.
#[must_use]
pub fn response_ok(response: &Value) -> bool {
    match response.get("ok") {
        Some(Value::Bool(ok)) => *ok,
        Some(Value::String(ok)) => ok.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// The response-wide `domain`, applied to entries that carry none of their own.
#[must_use]
pub fn top_level_domain(response: &Value) -> Option<&str> {
    response
        .get("domain")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
}
