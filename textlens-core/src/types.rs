//! Core types for analysis operations.

use crate::error::LensError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The text-analysis operation to run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Summarize,
    Translate,
    Sentiment,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Summarize => "summarize",
            Operation::Translate => "translate",
            Operation::Sentiment => "sentiment",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One analysis request: the operation plus the text it runs against.
///
/// Immutable once constructed; the constructors reject unusable input so a
/// request in hand is always well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub operation: Operation,
    pub source_text: String,
    pub target_language: Option<String>,
}

impl AnalysisRequest {
    /// Create a summarization request
    pub fn summarize(source_text: impl Into<String>) -> Result<Self, LensError> {
        Self::new(Operation::Summarize, source_text.into(), None)
    }

    /// Create a translation request to the given target language
    pub fn translate(
        source_text: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Result<Self, LensError> {
        let target_language = target_language.into();
        if target_language.trim().is_empty() {
            return Err(LensError::input("target language must not be empty"));
        }
        Self::new(Operation::Translate, source_text.into(), Some(target_language))
    }

    /// Create a sentiment analysis request
    pub fn sentiment(source_text: impl Into<String>) -> Result<Self, LensError> {
        Self::new(Operation::Sentiment, source_text.into(), None)
    }

    fn new(
        operation: Operation,
        source_text: String,
        target_language: Option<String>,
    ) -> Result<Self, LensError> {
        if source_text.trim().is_empty() {
            return Err(LensError::input("source text must not be empty"));
        }
        Ok(Self {
            operation,
            source_text,
            target_language,
        })
    }
}

/// Message role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Message in a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Response format constraint for chat completions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Plain text response
    Text,
    /// JSON object response (basic JSON mode, no schema validation)
    JsonObject,
    /// JSON Schema response (with strict schema validation)
    JsonSchema {
        name: String,
        schema: serde_json::Value,
        strict: bool,
    },
}

/// Chat completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
            response_format: None,
        }
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set response format
    pub fn with_response_format(mut self, response_format: ResponseFormat) -> Self {
        self.response_format = Some(response_format);
        self
    }
}

/// Usage statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Chat completion response, reduced to the single assistant message the
/// pipeline consumes. The provider has already mapped the transport outcome
/// to a typed error by the time one of these exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionResponse {
    pub id: String,
    pub model: String,
    pub content: String,
    pub usage: Usage,
}

/// Provider information
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
}

/// Sentiment classification, a closed set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        };
        f.write_str(label)
    }
}

/// Summarization result payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SummaryResult {
    /// Concise summary of the text, 2-3 sentences
    pub summary: String,
    /// 3 to 5 key points, most important first
    pub key_points: Vec<String>,
}

/// Translation result payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TranslationResult {
    /// Full translation of the text
    pub translated_text: String,
    /// Language the original text is written in
    pub source_language: String,
    /// Language the text was translated into
    pub target_language: String,
}

/// Sentiment analysis result payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SentimentResult {
    /// Overall sentiment of the text
    pub sentiment: SentimentLabel,
    /// Confidence in the classification
    #[schemars(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
    /// Brief explanation of the classification
    pub explanation: String,
}

/// Language detection payload, used for the auxiliary detection call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LanguageDetection {
    /// Full English name of the language, e.g. "English" or "Spanish"
    pub language: String,
}

/// A validated, operation-specific result.
///
/// An instance exists only if every required field of the corresponding
/// payload was present and well-typed; partially-valid responses never get
/// this far. Serialized untagged so the persisted `result` field holds the
/// operation's own field names directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnalysisResult {
    Summary(SummaryResult),
    Translation(TranslationResult),
    Sentiment(SentimentResult),
}

impl AnalysisResult {
    /// The operation this result belongs to
    pub fn operation(&self) -> Operation {
        match self {
            AnalysisResult::Summary(_) => Operation::Summarize,
            AnalysisResult::Translation(_) => Operation::Translate,
            AnalysisResult::Sentiment(_) => Operation::Sentiment,
        }
    }
}
