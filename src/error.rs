//! Error types for the resilience layer

use thiserror::Error;

/// Result type alias for provider operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Error type surfaced by providers and the resilient wrapper.
///
/// Retry decisions are made from the `Display` rendering of these errors
/// (see the [`classify`](crate::classify) module), so provider
/// implementations should keep the upstream status line and body in the
/// message where possible.
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// Provider API errors (bad responses, refusals, quota problems)
    #[error("LLM error: {message}")]
    Api {
        message: String,
        provider: Option<String>,
    },

    /// HTTP transport errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        status_code: Option<u16>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The call was cancelled while waiting to retry
    #[error("Call was cancelled")]
    Cancelled,
}

impl LlmError {
    /// Create a new API error
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            provider: None,
        }
    }

    /// Create an API error attributed to a provider
    pub fn api_with_provider(message: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Create a new HTTP error
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            status_code: None,
        }
    }

    /// Create an HTTP error with a status code
    pub fn http_with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Http {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
