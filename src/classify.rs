//! Text-based error classification.
//!
//! The resilience layer is provider-agnostic, so retry decisions are made
//! from the textual description of an error rather than structured status
//! fields: providers differ in how much structure they preserve, but the
//! status line and any `Retry-After` hint almost always survive into the
//! message.

use std::time::Duration;

/// Label forms recognized by [`parse_retry_after`], matched
/// case-insensitively. Colon forms are listed first so they win a tie at
/// the same position.
const RETRY_AFTER_LABELS: [&str; 4] = [
    "retry-after:",
    "retry_after:",
    "retry-after ",
    "retry_after ",
];

/// Check whether an error description names a non-retryable client error.
///
/// Scans left-to-right for maximal ASCII digit runs and interprets the
/// first run of exactly three digits as an HTTP-like status code. Returns
/// true iff that code is in `[400, 500)` and is neither 429 (rate limited)
/// nor 408 (request timeout), both of which remain retryable. Digit runs of
/// any other length are skipped without re-checking overlapping substrings.
pub fn is_non_retryable(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i - start == 3 {
                // First 3-digit run decides.
                let code = bytes[start..i]
                    .iter()
                    .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
                return (400..500).contains(&code) && code != 429 && code != 408;
            }
        } else {
            i += 1;
        }
    }
    false
}

/// Check whether an error description indicates rate limiting.
///
/// Requires both the digits `429` and one of the case-sensitive keywords
/// `Too Many`, `rate`, or `limit`, since the digits alone can appear in
/// unrelated numbers (request IDs, token counts).
pub fn is_rate_limited(text: &str) -> bool {
    text.contains("429")
        && (text.contains("Too Many") || text.contains("rate") || text.contains("limit"))
}

/// Extract a server-suggested retry delay from an error description.
///
/// Searches case-insensitively for the earliest `retry-after` /
/// `retry_after` label (colon or single trailing space), skips spaces and
/// tabs, and parses the decimal number immediately following. The number is
/// interpreted as seconds; fractional milliseconds are truncated. Returns
/// `None` when no label is present or no valid non-negative number follows
/// the first one.
pub fn parse_retry_after(text: &str) -> Option<Duration> {
    let lower = text.to_ascii_lowercase();
    let (pos, label) = RETRY_AFTER_LABELS
        .iter()
        .filter_map(|label| lower.find(label).map(|pos| (pos, label)))
        .min_by_key(|(pos, _)| *pos)?;

    let rest = &lower[pos + label.len()..];
    let rest = rest.trim_start_matches([' ', '\t']);

    let mut end = 0;
    let mut seen_dot = false;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '0'..='9' => end = idx + ch.len_utf8(),
            '.' if !seen_dot => {
                seen_dot = true;
                end = idx + ch.len_utf8();
            }
            _ => break,
        }
    }

    let number = &rest[..end];
    if !number.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let seconds: f64 = number.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    // Float-to-int casts saturate, so absurdly large hints stay valid here
    // and get clamped by the backoff ceiling downstream.
    Some(Duration::from_millis((seconds * 1000.0) as u64))
}
