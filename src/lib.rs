//! Palisade: resilience layer for LLM chat providers
//!
//! Wraps an abstract chat-completion provider with retry, exponential
//! backoff, and API key rotation so that calls against an unreliable,
//! rate-limited remote API behave predictably: transient failures are
//! retried with correct backoff (honoring server `Retry-After` hints),
//! quota exhaustion rotates to alternate credentials, and client errors
//! that retrying cannot fix fail fast.
//!
//! The layer is provider-agnostic: it knows only the [`ChatProvider`]
//! capability contract and the textual description of errors. It never
//! parses provider wire formats, persists configuration, or renders
//! prompts. Those concerns belong to the application around it.

pub mod backoff;
pub mod classify;
pub mod config;
pub mod error;
pub mod messages;
pub mod provider;
pub mod resilient;
pub mod rotation;


// Re-export commonly used types
pub use config::RetryConfig;
pub use error::{LlmError, LlmResult};
pub use messages::{LlmMessage, LlmResponse, MessageRole, ToolCall};
pub use provider::ChatProvider;
pub use resilient::ResilientProvider;
pub use rotation::KeyRotator;
