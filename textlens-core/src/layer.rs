//! Layer trait and abstractions.
//!
//! Layers provide a composable way to wrap providers with cross-cutting
//! concerns like logging and retry. Each layer wraps an inner provider and
//! returns a new provider with enhanced behavior.

use crate::error::LensError;
use crate::provider::Provider;
use crate::types::{CompletionRequest, CompletionResponse, ProviderInfo};
use async_trait::async_trait;
use std::sync::Arc;

/// Layer trait for wrapping providers.
pub trait Layer<P: Provider> {
    /// The type of the layered provider
    type LayeredProvider: Provider;

    /// Wrap the inner provider with this layer
    fn layer(&self, inner: P) -> Self::LayeredProvider;
}

/// Helper trait for layered providers.
///
/// Provides default forwarding implementations, so a layer only overrides
/// the methods it wants to intercept.
#[async_trait]
pub trait LayeredProvider: Sized + Provider {
    /// The inner provider type
    type Inner: Provider;

    /// Get a reference to the inner provider
    fn inner(&self) -> &Self::Inner;

    /// Default implementation for info - forwards to inner
    fn layered_info(&self) -> Arc<ProviderInfo> {
        self.inner().info()
    }

    /// Default implementation for complete - forwards to inner
    async fn layered_complete(
        &self,
        req: CompletionRequest,
    ) -> Result<CompletionResponse, LensError> {
        self.inner().complete(req).await
    }
}
