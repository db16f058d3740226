//! UTF-8-safe string truncation for log output
//!
//! Product titles and seller names are frequently Korean, so byte slicing
//! would panic on character boundaries.

/// Truncate to at most `max_chars` characters (not bytes).
#[inline]
#[must_use]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
