//! Retry layer with exponential backoff.
//!
//! This is the resilient invoker: it re-issues a provider call on transient
//! failures (network, timeout, rate limit, server-side) up to an attempt
//! ceiling, waiting `base_delay * multiplier^attempt` between attempts.
//! Terminal failures pass through untouched after a single attempt, and an
//! exhausted call surfaces the last underlying cause.
//!
//! Sleeping goes through the [`Sleeper`] trait so tests can observe the
//! backoff schedule without real delays, and a [`CancelToken`] is checked
//! before each backoff sleep so a caller can abandon a pending call between
//! attempts.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use textlens_core::error::LensError;
use textlens_core::layer::{Layer, LayeredProvider};
use textlens_core::provider::Provider;
use textlens_core::types::{CompletionRequest, CompletionResponse, ProviderInfo};

/// Sleep dependency for backoff waits.
#[async_trait]
pub trait Sleeper: Send + Sync + Debug {
    async fn sleep(&self, duration: Duration);
}

/// Default sleeper backed by the tokio timer.
#[derive(Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Cooperative cancellation handle, checked between retry attempts.
///
/// Cloning shares the underlying flag; cancel from one clone and every
/// holder observes it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation before the next retry sleep
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Retry layer configuration.
///
/// Defaults: 3 attempts total, 1s base delay doubling per attempt, 30s cap,
/// no jitter.
#[derive(Debug, Clone)]
pub struct RetryLayer {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f64,
    sleeper: Arc<dyn Sleeper>,
    cancel: CancelToken,
}

impl RetryLayer {
    /// Create a new retry layer with default settings
    pub fn new() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            sleeper: Arc::new(TokioSleeper),
            cancel: CancelToken::new(),
        }
    }

    /// Set the total attempt ceiling (first attempt included)
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the base delay before the first retry
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the maximum delay between attempts
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set the backoff multiplier
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Replace the sleep implementation
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Attach a cancellation token
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Calculate delay for a given zero-based attempt index
    fn delay_for(&self, attempt: u32) -> Duration {
        let delay_ms =
            self.base_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }
}

impl Default for RetryLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Provider> Layer<P> for RetryLayer {
    type LayeredProvider = RetryProvider<P>;

    fn layer(&self, inner: P) -> Self::LayeredProvider {
        RetryProvider {
            inner,
            config: self.clone(),
        }
    }
}

/// Provider wrapped with retry logic
#[derive(Debug)]
pub struct RetryProvider<P> {
    inner: P,
    config: RetryLayer,
}

impl<P: Provider> RetryProvider<P> {
    /// Execute with retry logic.
    ///
    /// Nothing is carried between attempts except the attempt counter and
    /// the last error; every attempt issues a fresh call.
    async fn execute_with_retry<T, F, Fut>(&self, mut operation: F) -> Result<T, LensError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, LensError>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if !err.is_retryable() {
                        return Err(err);
                    }
                    if attempt >= self.config.max_attempts {
                        return Err(LensError::exhausted(attempt, err));
                    }
                    if self.config.cancel.is_cancelled() {
                        return Err(LensError::Cancelled);
                    }

                    let delay = self.config.delay_for(attempt - 1);
                    tracing::debug!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        ?delay,
                        error = %err,
                        "transient failure, backing off"
                    );
                    self.config.sleeper.sleep(delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl<P: Provider> LayeredProvider for RetryProvider<P> {
    type Inner = P;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn layered_complete(
        &self,
        req: CompletionRequest,
    ) -> Result<CompletionResponse, LensError> {
        // Clone req for retry attempts
        let req_clone = req.clone();
        self.execute_with_retry(|| {
            let req = req_clone.clone();
            async move { self.inner.complete(req).await }
        })
        .await
    }
}

#[async_trait]
impl<P: Provider> Provider for RetryProvider<P> {
    fn info(&self) -> Arc<ProviderInfo> {
        LayeredProvider::layered_info(self)
    }

    async fn complete(&self, req: CompletionRequest) -> Result<CompletionResponse, LensError> {
        LayeredProvider::layered_complete(self, req).await
    }
}
