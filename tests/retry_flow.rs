//! End-to-end retry scenarios against a scripted provider

use async_trait::async_trait;
use palisade::{
    ChatProvider, LlmError, LlmMessage, LlmResponse, LlmResult, ResilientProvider, RetryConfig,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Provider that fails the first `fail_until` calls, then succeeds.
struct ScriptedProvider {
    calls: Arc<AtomicU32>,
    fail_until: u32,
    error_message: String,
}

impl ScriptedProvider {
    fn new(fail_until: u32, error_message: impl Into<String>) -> (Self, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let provider = Self {
            calls: Arc::clone(&calls),
            fail_until,
            error_message: error_message.into(),
        };
        (provider, calls)
    }

    fn outcome(&self) -> LlmResult<()> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.fail_until {
            Err(LlmError::api(self.error_message.clone()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn chat_with_system(
        &self,
        _system_prompt: Option<&str>,
        _message: &str,
        _model: &str,
        _temperature: f32,
    ) -> LlmResult<String> {
        self.outcome().map(|_| "done".to_string())
    }

    async fn chat(
        &self,
        _messages: &[LlmMessage],
        _model: &str,
        _temperature: f32,
    ) -> LlmResult<LlmResponse> {
        self.outcome()
            .map(|_| LlmResponse::new("done").with_model("test-model"))
    }

    fn supports_native_tools(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "scripted"
    }

    async fn close(&mut self) -> LlmResult<()> {
        Ok(())
    }
}

fn config(max_retries: u32) -> RetryConfig {
    RetryConfig::new()
        .with_max_retries(max_retries)
        .with_base_backoff_ms(50)
}

#[tokio::test]
async fn recovers_after_transient_failures() {
    init_tracing();
    let (inner, calls) = ScriptedProvider::new(2, "503 upstream hiccup");
    let provider = ResilientProvider::new(inner, config(3));

    let reply = provider
        .chat_with_system(Some("be brief"), "hello", "test-model", 0.7)
        .await
        .unwrap();

    assert_eq!(reply, "done");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausts_budget_and_propagates_final_error() {
    init_tracing();
    let (inner, calls) = ScriptedProvider::new(100, "connection reset by peer");
    let provider = ResilientProvider::new(inner, config(2));

    let error = provider
        .chat(&[LlmMessage::user("hello")], "test-model", 0.0)
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(error.to_string().contains("connection reset"));
}

#[tokio::test]
async fn zero_retries_means_single_attempt() {
    init_tracing();
    let (inner, calls) = ScriptedProvider::new(100, "500 Internal Server Error");
    let provider = ResilientProvider::new(inner, config(0));

    let result = provider
        .chat_with_system(None, "hello", "test-model", 0.0)
        .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn structured_chat_retries_with_identical_semantics() {
    init_tracing();
    let (inner, calls) = ScriptedProvider::new(1, "429 rate limit, Retry-After: 0.05");
    let provider = ResilientProvider::new(inner, config(2));

    let messages = vec![
        LlmMessage::system("be brief"),
        LlmMessage::user("hello"),
        LlmMessage::assistant("hi"),
        LlmMessage::user("again"),
    ];
    let response = provider.chat(&messages, "test-model", 0.3).await.unwrap();

    assert_eq!(response.content, "done");
    assert_eq!(response.model.as_deref(), Some("test-model"));
    assert!(!response.has_tool_calls());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn wrapper_is_substitutable_for_a_plain_provider() {
    init_tracing();
    async fn ask(provider: &dyn ChatProvider) -> LlmResult<String> {
        provider.chat_with_system(None, "ping", "test-model", 0.0).await
    }

    let (inner, _) = ScriptedProvider::new(0, "unused");
    let provider = ResilientProvider::new(inner, config(1));

    assert_eq!(ask(&provider).await.unwrap(), "done");
    assert_eq!(provider.name(), "scripted");
    assert!(!provider.supports_native_tools());
}
