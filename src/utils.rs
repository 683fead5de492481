//! Small helpers for timestamps and log output.

use chrono::Local;

/// Current local time, formatted the way fallback `published` values are stored.
///
/// # Examples
///
/// ```ignore
/// // "2024-07-01 10:00:00.123456"
/// let now = local_timestamp();
/// ```
pub fn local_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a character
/// boundary) with an ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}
