//! Resilient provider wrapper

use crate::backoff;
use crate::classify;
use crate::config::RetryConfig;
use crate::error::{LlmError, LlmResult};
use crate::messages::{LlmMessage, LlmResponse};
use crate::provider::ChatProvider;
use crate::rotation::KeyRotator;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Retry wrapper around a [`ChatProvider`].
///
/// Drives up to `max_retries + 1` attempts against the wrapped provider,
/// classifying each failure from its textual description:
///
/// - non-retryable 4xx client errors short-circuit immediately,
/// - rate-limit errors advance the API key rotator before the next attempt,
/// - everything else is retried with exponential backoff, honoring
///   server-suggested `Retry-After` delays up to a 30 s ceiling.
///
/// The wrapper itself implements [`ChatProvider`], so it can be dropped in
/// wherever a plain provider is expected. Capability queries and teardown
/// forward straight to the wrapped provider. Per-call retry state (attempt
/// index, running backoff, last error) is local to each call, so concurrent
/// calls through one wrapper never interfere; only the key rotator's cursor
/// is shared, and that is atomic.
///
/// # Examples
///
/// ```no_run
/// use palisade::{ChatProvider, ResilientProvider, RetryConfig};
///
/// # async fn example(inner: impl ChatProvider) -> Result<(), Box<dyn std::error::Error>> {
/// let config = RetryConfig::new()
///     .with_max_retries(3)
///     .with_base_backoff_ms(500);
/// let provider = ResilientProvider::new(inner, config);
///
/// let reply = provider
///     .chat_with_system(Some("You are terse."), "ping?", "gpt-4o-mini", 0.2)
///     .await?;
/// println!("{reply}");
/// # Ok(())
/// # }
/// ```
pub struct ResilientProvider<P: ChatProvider> {
    inner: P,
    config: RetryConfig,
    rotator: Arc<KeyRotator>,
    cancellation: Option<CancellationToken>,
}

impl<P: ChatProvider> ResilientProvider<P> {
    /// Wrap a provider with the given retry configuration.
    ///
    /// The wrapper takes exclusive ownership of the provider; teardown is
    /// forwarded through [`ChatProvider::close`].
    pub fn new(inner: P, config: RetryConfig) -> Self {
        let rotator = Arc::new(KeyRotator::new(config.alternate_api_keys.clone()));
        Self {
            inner,
            config,
            rotator,
            cancellation: None,
        }
    }

    /// Attach a cancellation token.
    ///
    /// The token is checked only during backoff waits, the single
    /// suspension point in the retry loop. If it fires mid-wait the call
    /// aborts with [`LlmError::Cancelled`].
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The shared key rotator.
    ///
    /// Rotation is fire-and-forget from the retry loop's point of view: the
    /// wrapper advances the cursor when it sees a rate-limit error, and the
    /// inner provider (or the caller) picks the rotated key up from this
    /// handle on the next attempt.
    pub fn rotator(&self) -> Arc<KeyRotator> {
        Arc::clone(&self.rotator)
    }

    /// The retry configuration this wrapper was built with
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Unwrap, returning the inner provider
    pub fn into_inner(self) -> P {
        self.inner
    }

    /// Execute an operation with retry, backoff, and key rotation.
    ///
    /// Returns the first success, or the *last* error once the attempt
    /// budget is spent, never a synthetic "gave up" error, so callers can
    /// inspect the true cause. Non-retryable client errors propagate
    /// immediately regardless of remaining budget.
    async fn execute_with_retry<T, F, Fut>(&self, operation: F) -> LlmResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = LlmResult<T>>,
    {
        let max_retries = self.config.max_retries;
        let mut backoff_base = self.config.base_backoff();
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempt = attempt + 1, "request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    let description = error.to_string();

                    if classify::is_non_retryable(&description) {
                        warn!(error = %error, "non-retryable client error, not retrying");
                        return Err(error);
                    }

                    if classify::is_rate_limited(&description) && self.rotator.rotate().is_some() {
                        debug!("rate limited, advanced to next alternate api key");
                    }

                    last_error = Some(error);

                    if attempt < max_retries {
                        let wait = backoff::compute_backoff(backoff_base, &description);
                        warn!(
                            attempt = attempt + 1,
                            max_attempts = max_retries + 1,
                            delay_ms = wait.as_millis() as u64,
                            "attempt failed, retrying"
                        );
                        self.wait(wait).await?;
                        backoff_base = backoff::next_base(backoff_base);
                    } else {
                        warn!(
                            attempts = max_retries + 1,
                            "all retry attempts exhausted"
                        );
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::api("retry loop finished without an error")))
    }

    async fn wait(&self, delay: Duration) -> LlmResult<()> {
        match &self.cancellation {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => Err(LlmError::Cancelled),
                    _ = sleep(delay) => Ok(()),
                }
            }
            None => {
                sleep(delay).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl<P: ChatProvider> ChatProvider for ResilientProvider<P> {
    #[instrument(skip(self, system_prompt, message), fields(provider = %self.inner.name(), model = %model))]
    async fn chat_with_system(
        &self,
        system_prompt: Option<&str>,
        message: &str,
        model: &str,
        temperature: f32,
    ) -> LlmResult<String> {
        self.execute_with_retry(|| async {
            self.inner
                .chat_with_system(system_prompt, message, model, temperature)
                .await
        })
        .await
    }

    #[instrument(skip(self, messages), fields(provider = %self.inner.name(), model = %model))]
    async fn chat(
        &self,
        messages: &[LlmMessage],
        model: &str,
        temperature: f32,
    ) -> LlmResult<LlmResponse> {
        self.execute_with_retry(|| async { self.inner.chat(messages, model, temperature).await })
            .await
    }

    fn supports_native_tools(&self) -> bool {
        self.inner.supports_native_tools()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn close(&mut self) -> LlmResult<()> {
        self.inner.close().await
    }
}
