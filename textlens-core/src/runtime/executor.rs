//! AnalysisExecutor implementation.
//!
//! The executor drives one end-to-end pipeline run: build the prompt
//! envelope, detect the document language, invoke the provider with a
//! schema-constrained completion request, validate the response, and
//! assemble the output record.

use crate::error::LensError;
use crate::layer::Layer;
use crate::prompt::PromptEnvelope;
use crate::provider::Provider;
use crate::record::{word_count, OutputRecord};
use crate::types::{AnalysisRequest, CompletionRequest, ProviderInfo, ResponseFormat};
use crate::validate;
use chrono::Utc;
use std::sync::Arc;

/// Type-erased provider that can be shared across threads
type BoxedProvider = Arc<dyn Provider>;

/// Builder for composing an executor from a provider, layers, and model
/// configuration.
///
/// Layers are applied with static dispatch while building; the finished
/// executor holds a single type-erased provider.
///
/// # Example
///
/// ```ignore
/// let executor = AnalysisExecutor::builder(provider, "gpt-4o-mini")
///     .layer(LoggingLayer::new())
///     .layer(RetryLayer::new())
///     .finish();
/// ```
pub struct AnalysisExecutorBuilder<P> {
    provider: P,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl<P: Provider> AnalysisExecutorBuilder<P> {
    /// Create a new builder with a provider and the model to call
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Add a layer to wrap the provider
    pub fn layer<L>(self, layer: L) -> AnalysisExecutorBuilder<L::LayeredProvider>
    where
        L: Layer<P>,
    {
        AnalysisExecutorBuilder {
            provider: layer.layer(self.provider),
            model: self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Set the sampling temperature for every call
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the response length for every call
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Finish building and create an AnalysisExecutor
    pub fn finish(self) -> AnalysisExecutor {
        AnalysisExecutor {
            provider: Arc::new(self.provider),
            model: self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Orchestrates one analysis pipeline run at a time.
///
/// Holds no mutable state; every run owns its request, envelope, and raw
/// response exclusively and discards them at the end of each stage.
pub struct AnalysisExecutor {
    provider: BoxedProvider,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl AnalysisExecutor {
    /// Create a new builder
    pub fn builder<P: Provider>(
        provider: P,
        model: impl Into<String>,
    ) -> AnalysisExecutorBuilder<P> {
        AnalysisExecutorBuilder::new(provider, model)
    }

    /// Get provider information
    pub fn info(&self) -> Arc<ProviderInfo> {
        self.provider.info()
    }

    /// Run one analysis end to end and assemble the output record.
    ///
    /// `file` identifies the source document in the persisted record. The
    /// record exists only if every stage succeeded; any failure leaves no
    /// partial result behind.
    pub async fn analyze(
        &self,
        file: impl Into<String>,
        request: AnalysisRequest,
    ) -> Result<OutputRecord, LensError> {
        let file = file.into();
        let request_id = uuid::Uuid::new_v4();
        tracing::info!(
            %request_id,
            operation = %request.operation,
            file = %file,
            "starting analysis"
        );

        let envelope = PromptEnvelope::build(&request)?;
        let language_detected = self.detect_language(&request.source_text).await?;
        let words = word_count(&request.source_text);

        let body = self.complete_envelope(&envelope).await?;
        let result = validate::validate(&body, request.operation)?;

        let record = OutputRecord::assemble(
            file,
            &request,
            result,
            language_detected,
            words,
            Utc::now(),
        );
        tracing::info!(%request_id, "analysis complete");
        Ok(record)
    }

    /// Detect the language of a text via the provider.
    pub async fn detect_language(&self, source_text: &str) -> Result<String, LensError> {
        let envelope = PromptEnvelope::language_detection(source_text)?;
        let body = self.complete_envelope(&envelope).await?;
        validate::validate_language(&body)
    }

    /// Issue one schema-constrained completion for an envelope and return
    /// the raw response body.
    async fn complete_envelope(&self, envelope: &PromptEnvelope) -> Result<String, LensError> {
        let mut req = CompletionRequest::new(&self.model, envelope.messages())
            .with_response_format(ResponseFormat::JsonSchema {
                name: "analysis_response".to_string(),
                schema: envelope.schema.clone(),
                strict: true,
            });
        if let Some(temperature) = self.temperature {
            req = req.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            req = req.with_max_tokens(max_tokens);
        }

        let response = self.provider.complete(req).await?;
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisResult, CompletionResponse, Usage};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Replays a scripted sequence of outcomes, one per `complete` call.
    #[derive(Debug)]
    struct ScriptedProvider {
        outcomes: Mutex<VecDeque<Result<String, LensError>>>,
        calls: Arc<AtomicU32>,
    }

    impl ScriptedProvider {
        fn new(outcomes: Vec<Result<String, LensError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: Arc::new(AtomicU32::new(0)),
            }
        }

        /// Counter handle that stays observable after the provider moves
        /// into the executor.
        fn calls_handle(&self) -> Arc<AtomicU32> {
            Arc::clone(&self.calls)
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn info(&self) -> Arc<ProviderInfo> {
            Arc::new(ProviderInfo {
                id: "scripted".to_string(),
                name: "Scripted".to_string(),
            })
        }

        async fn complete(
            &self,
            req: CompletionRequest,
        ) -> Result<CompletionResponse, LensError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self
                .outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("script ran out of outcomes");
            outcome.map(|content| CompletionResponse {
                id: "resp-1".to_string(),
                model: req.model,
                content,
                usage: Usage {
                    prompt_tokens: 10,
                    completion_tokens: 20,
                    total_tokens: 30,
                },
            })
        }
    }

    const LANGUAGE_BODY: &str = r#"{"language": "English"}"#;

    #[tokio::test]
    async fn summarize_pipeline_produces_a_record() {
        let text = "diagnosis ".repeat(234);
        let summary_body = r#"{
            "summary": "AI improves diagnostics.",
            "key_points": ["faster reads", "fewer errors", "better triage"]
        }"#;
        let provider = ScriptedProvider::new(vec![
            Ok(LANGUAGE_BODY.to_string()),
            Ok(summary_body.to_string()),
        ]);
        let calls = provider.calls_handle();
        let executor = AnalysisExecutor::builder(provider, "test-model").finish();

        let request = AnalysisRequest::summarize(text).unwrap();
        let record = executor.analyze("ai_overview", request).await.unwrap();

        assert_eq!(record.file, "ai_overview");
        assert_eq!(record.word_count, 234);
        assert_eq!(record.language_detected, "English");
        // one detection call plus one analysis call
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        match record.result {
            AnalysisResult::Summary(ref s) => assert_eq!(s.key_points.len(), 3),
            ref other => panic!("wrong variant: {other:?}"),
        }
    }

    #[tokio::test]
    async fn schema_violation_yields_no_record() {
        // translation response missing source_language
        let bad_body = r#"{"translated_text": "Hola", "target_language": "Spanish"}"#;
        let provider = ScriptedProvider::new(vec![
            Ok(LANGUAGE_BODY.to_string()),
            Ok(bad_body.to_string()),
        ]);
        let executor = AnalysisExecutor::builder(provider, "test-model").finish();

        let request = AnalysisRequest::translate("hello world", "Spanish").unwrap();
        let err = executor.analyze("greeting", request).await.unwrap_err();
        assert!(matches!(err, LensError::SchemaViolation(_)));
    }

    #[tokio::test]
    async fn provider_failures_propagate_unchanged() {
        let provider = ScriptedProvider::new(vec![Err(LensError::rate_limit("429"))]);
        let executor = AnalysisExecutor::builder(provider, "test-model").finish();

        let request = AnalysisRequest::sentiment("some text").unwrap();
        let err = executor.analyze("review", request).await.unwrap_err();
        assert!(matches!(err, LensError::RateLimit(_)));
    }

    #[tokio::test]
    async fn result_fields_survive_into_the_record_exactly() {
        let sentiment_body = r#"{
            "sentiment": "negative",
            "confidence": 0.95,
            "explanation": "persistent complaints about delivery"
        }"#;
        let provider = ScriptedProvider::new(vec![
            Ok(LANGUAGE_BODY.to_string()),
            Ok(sentiment_body.to_string()),
        ]);
        let executor = AnalysisExecutor::builder(provider, "test-model").finish();

        let request = AnalysisRequest::sentiment("the product broke twice").unwrap();
        let record = executor.analyze("review", request).await.unwrap();

        let expected =
            validate::validate(sentiment_body, crate::types::Operation::Sentiment).unwrap();
        assert_eq!(record.result, expected);
    }
}
