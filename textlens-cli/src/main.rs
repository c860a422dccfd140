//! textlens binary: composition root.

mod config;
mod loader;
mod shell;
mod store;

use anyhow::Context;
use config::AppConfig;
use shell::Shell;
use store::OutputStore;
use textlens_core::AnalysisExecutor;
use textlens_layer::{LoggingLayer, RetryLayer};
use textlens_provider::OpenAiProvider;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; a missing file is not an error
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("textlens=info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;
    tracing::debug!(model = %config.model, output_dir = %config.output_dir.display(), "configured");

    let mut provider_builder = OpenAiProvider::builder().api_key(&config.api_key);
    if let Some(api_base) = &config.api_base {
        provider_builder = provider_builder.api_base(api_base);
    }
    let provider = provider_builder
        .build()
        .context("failed to initialize the model provider")?;

    // retry wraps logging, so every attempt is logged individually
    let mut builder = AnalysisExecutor::builder(provider, &config.model)
        .layer(LoggingLayer::new())
        .layer(RetryLayer::new());
    if let Some(temperature) = config.temperature {
        builder = builder.temperature(temperature);
    }
    if let Some(max_tokens) = config.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    let executor = builder.finish();

    let store = OutputStore::new(&config.output_dir);
    Shell::new(executor, store).run().await
}
