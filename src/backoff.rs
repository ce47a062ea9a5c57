//! Backoff computation between retry attempts

use crate::classify::parse_retry_after;
use std::time::Duration;

/// Floor for the configured base backoff interval
pub const MIN_BASE_BACKOFF: Duration = Duration::from_millis(50);

/// Ceiling for the self-imposed exponential growth of the base interval
pub const MAX_BACKOFF_GROWTH: Duration = Duration::from_millis(10_000);

/// Ceiling for any single wait, including server-suggested delays
pub const MAX_SERVER_BACKOFF: Duration = Duration::from_millis(30_000);

/// Compute the wait before the next attempt.
///
/// A server-suggested `Retry-After` delay found in `error_text` is honored,
/// but never below the current `base` interval and never above 30 s.
/// Without a suggestion the wait is simply `base`.
///
/// Pure: repeated calls with the same arguments return the same duration.
pub fn compute_backoff(base: Duration, error_text: &str) -> Duration {
    match parse_retry_after(error_text) {
        Some(suggested) => suggested.clamp(base.min(MAX_SERVER_BACKOFF), MAX_SERVER_BACKOFF),
        None => base,
    }
}

/// Grow the running base interval after a failed, retryable attempt.
///
/// Saturating doubling, capped at 10 s. A server-suggested delay can still
/// push the actual wait from [`compute_backoff`] up to 30 s; only the
/// growth of the base itself is capped here.
pub fn next_base(base: Duration) -> Duration {
    base.saturating_mul(2).min(MAX_BACKOFF_GROWTH)
}
