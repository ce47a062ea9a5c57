//! Provider capability trait

use crate::error::LlmResult;
use crate::messages::{LlmMessage, LlmResponse};
use async_trait::async_trait;

/// Capability contract for a chat-completion provider.
///
/// Concrete providers (HTTP clients for hosted APIs, local inference, test
/// doubles) implement this trait; [`ResilientProvider`] implements it too,
/// so the wrapper is substitutable wherever a plain provider is expected.
///
/// [`ResilientProvider`]: crate::ResilientProvider
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a single user message with optional system instructions and
    /// return the textual completion.
    async fn chat_with_system(
        &self,
        system_prompt: Option<&str>,
        message: &str,
        model: &str,
        temperature: f32,
    ) -> LlmResult<String>;

    /// Send an ordered conversation and return the structured response.
    async fn chat(
        &self,
        messages: &[LlmMessage],
        model: &str,
        temperature: f32,
    ) -> LlmResult<LlmResponse>;

    /// Whether the provider supports native tool calling
    fn supports_native_tools(&self) -> bool;

    /// Display name of the provider
    fn name(&self) -> &str;

    /// Release any held resources
    async fn close(&mut self) -> LlmResult<()>;
}
