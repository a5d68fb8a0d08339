//! Production version identifiers (`v<major>.<minor>.<patch>`)

/// Version assigned when there is no usable current version
pub const BASELINE_VERSION: &str = "v0.1.0";

/// Next version after `current`, incrementing the patch component.
///
/// Absent or malformed identifiers reset to [`BASELINE_VERSION`]. Major and
/// minor components are carried over as written.
pub fn bump_patch(current: Option<&str>) -> String {
    let Some(rest) = current.and_then(|v| v.strip_prefix('v')) else {
        return BASELINE_VERSION.to_string();
    };

    let parts: Vec<&str> = rest.split('.').collect();
    let [major, minor, patch] = parts.as_slice() else {
        return BASELINE_VERSION.to_string();
    };

    match patch.parse::<u64>().ok().and_then(|p| p.checked_add(1)) {
        Some(next) => format!("v{major}.{minor}.{next}"),
        None => BASELINE_VERSION.to_string(),
    }
}
