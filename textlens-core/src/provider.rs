//! Provider trait and core abstractions.

use crate::error::LensError;
use crate::types::{CompletionRequest, CompletionResponse, ProviderInfo};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Core provider trait for remote text-generation services.
///
/// A provider issues exactly one outbound call per `complete` invocation;
/// retry, logging, and other cross-cutting behavior is added by wrapping the
/// provider in layers.
#[async_trait]
pub trait Provider: Send + Sync + Debug + 'static {
    /// Get provider information
    fn info(&self) -> Arc<ProviderInfo>;

    /// Run one chat completion against the remote service.
    async fn complete(&self, req: CompletionRequest) -> Result<CompletionResponse, LensError>;
}
