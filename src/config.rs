//! Retry configuration handed in by the application's configuration layer

use crate::backoff::MIN_BASE_BACKOFF;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry tuning for a [`ResilientProvider`](crate::ResilientProvider).
///
/// Immutable for the lifetime of the wrapper. How this configuration is
/// produced (setup wizard, config file, environment) is outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt (0 = no retry)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff interval in milliseconds, floor-clamped to 50 ms
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    /// Alternate API keys rotated through when rate limiting is detected
    #[serde(default)]
    pub alternate_api_keys: Vec<String>,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_backoff_ms() -> u64 {
    500
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
            alternate_api_keys: Vec::new(),
        }
    }
}

impl RetryConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base backoff interval in milliseconds
    pub fn with_base_backoff_ms(mut self, base_backoff_ms: u64) -> Self {
        self.base_backoff_ms = base_backoff_ms;
        self
    }

    /// Set the alternate API key list
    pub fn with_alternate_api_keys(mut self, keys: Vec<String>) -> Self {
        self.alternate_api_keys = keys;
        self
    }

    /// Effective base backoff interval.
    ///
    /// Floor-clamped to 50 ms so a zero or tiny configured value cannot
    /// busy-loop the retry machinery.
    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms).max(MIN_BASE_BACKOFF)
    }
}
