//! Logging layer for provider operations.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use textlens_core::error::LensError;
use textlens_core::layer::{Layer, LayeredProvider};
use textlens_core::provider::Provider;
use textlens_core::types::{CompletionRequest, CompletionResponse, ProviderInfo};

/// Logging layer that logs provider operations.
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    prefix: String,
}

impl LoggingLayer {
    /// Create a new logging layer
    pub fn new() -> Self {
        Self {
            prefix: "[textlens]".to_string(),
        }
    }

    /// Create a logging layer with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Provider> Layer<P> for LoggingLayer {
    type LayeredProvider = LoggingProvider<P>;

    fn layer(&self, inner: P) -> Self::LayeredProvider {
        LoggingProvider {
            inner,
            prefix: self.prefix.clone(),
        }
    }
}

/// Provider wrapped with logging
#[derive(Debug)]
pub struct LoggingProvider<P> {
    inner: P,
    prefix: String,
}

#[async_trait]
impl<P: Provider> LayeredProvider for LoggingProvider<P> {
    type Inner = P;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn layered_complete(
        &self,
        req: CompletionRequest,
    ) -> Result<CompletionResponse, LensError> {
        tracing::debug!(
            "{} complete request: model={}, messages={}",
            self.prefix,
            req.model,
            req.messages.len()
        );

        let start = std::time::Instant::now();
        let result = self.inner.complete(req).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::debug!(
                    "{} complete success: id={}, tokens={}, elapsed={:?}",
                    self.prefix,
                    response.id,
                    response.usage.total_tokens,
                    elapsed
                );
            }
            Err(e) => {
                tracing::error!(
                    "{} complete error: {:?}, elapsed={:?}",
                    self.prefix,
                    e,
                    elapsed
                );
            }
        }

        result
    }
}

#[async_trait]
impl<P: Provider> Provider for LoggingProvider<P> {
    fn info(&self) -> Arc<ProviderInfo> {
        LayeredProvider::layered_info(self)
    }

    async fn complete(&self, req: CompletionRequest) -> Result<CompletionResponse, LensError> {
        LayeredProvider::layered_complete(self, req).await
    }
}
