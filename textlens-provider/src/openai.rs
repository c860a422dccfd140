//! OpenAI provider implementation using the async-openai crate.
//!
//! The provider owns the single network boundary: one outbound call per
//! `complete` invocation, with the transport outcome classified into the
//! crate's error taxonomy so the retry layer can tell transient failures
//! from terminal ones.

use async_openai::config::OpenAIConfig;
use async_openai::error::{ApiError, OpenAIError};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    ResponseFormat as OpenAIResponseFormat,
    ResponseFormatJsonSchema as OpenAIResponseFormatJsonSchema,
};
use async_openai::Client;
use async_trait::async_trait;
use std::sync::Arc;
use textlens_core::error::LensError;
use textlens_core::provider::Provider;
use textlens_core::types::{
    CompletionRequest, CompletionResponse, Message, ProviderInfo, ResponseFormat, Role, Usage,
};

/// OpenAI provider using async-openai
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    info: Arc<ProviderInfo>,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("info", &self.info)
            .finish()
    }
}

impl OpenAiProvider {
    /// Create a builder for configuration options
    pub fn builder() -> OpenAiBuilder {
        OpenAiBuilder::default()
    }

    /// Convert our Message type to OpenAI's ChatCompletionRequestMessage
    fn convert_message(msg: &Message) -> Result<ChatCompletionRequestMessage, LensError> {
        match msg.role {
            Role::System => {
                let msg = ChatCompletionRequestSystemMessageArgs::default()
                    .content(msg.content.clone())
                    .build()
                    .map_err(|e| {
                        LensError::provider(format!("failed to build system message: {e}"))
                    })?;
                Ok(ChatCompletionRequestMessage::System(msg))
            }
            Role::User => {
                let msg = ChatCompletionRequestUserMessageArgs::default()
                    .content(msg.content.clone())
                    .build()
                    .map_err(|e| {
                        LensError::provider(format!("failed to build user message: {e}"))
                    })?;
                Ok(ChatCompletionRequestMessage::User(msg))
            }
            Role::Assistant => {
                let msg = ChatCompletionRequestAssistantMessageArgs::default()
                    .content(msg.content.clone())
                    .build()
                    .map_err(|e| {
                        LensError::provider(format!("failed to build assistant message: {e}"))
                    })?;
                Ok(ChatCompletionRequestMessage::Assistant(msg))
            }
        }
    }

    /// Convert our ResponseFormat to OpenAI's ResponseFormat
    fn convert_response_format(format: &ResponseFormat) -> OpenAIResponseFormat {
        match format {
            ResponseFormat::Text => OpenAIResponseFormat::Text,
            ResponseFormat::JsonObject => OpenAIResponseFormat::JsonObject,
            ResponseFormat::JsonSchema {
                name,
                schema,
                strict,
            } => {
                let json_schema = OpenAIResponseFormatJsonSchema {
                    name: name.clone(),
                    schema: Some(schema.clone()),
                    strict: Some(*strict),
                    description: None,
                };
                OpenAIResponseFormat::JsonSchema { json_schema }
            }
        }
    }

    /// Build CreateChatCompletionRequest from our CompletionRequest
    fn build_request(
        &self,
        req: &CompletionRequest,
    ) -> Result<CreateChatCompletionRequest, LensError> {
        let messages: Result<Vec<_>, _> = req.messages.iter().map(Self::convert_message).collect();

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&req.model).messages(messages?);

        if let Some(temperature) = req.temperature {
            builder.temperature(temperature);
        }
        if let Some(max_tokens) = req.max_tokens {
            builder.max_tokens(max_tokens);
        }
        if let Some(response_format) = &req.response_format {
            builder.response_format(Self::convert_response_format(response_format));
        }

        builder
            .build()
            .map_err(|e| LensError::provider(format!("failed to build request: {e}")))
    }

    /// Convert OpenAI response to our CompletionResponse
    fn convert_response(
        response: async_openai::types::CreateChatCompletionResponse,
    ) -> Result<CompletionResponse, LensError> {
        let first_choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LensError::provider("no choices in response"))?;

        let content = first_choice
            .message
            .content
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LensError::provider("empty response from model"))?;

        let usage = response.usage.map_or(
            Usage {
                prompt_tokens: 0,
                completion_tokens: 0,
                total_tokens: 0,
            },
            |u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            },
        );

        Ok(CompletionResponse {
            id: response.id,
            model: response.model,
            content,
            usage,
        })
    }
}

/// Classify an async-openai failure into the error taxonomy.
fn classify_error(err: OpenAIError) -> LensError {
    match err {
        OpenAIError::Reqwest(e) => {
            if e.is_timeout() {
                LensError::timeout(e.to_string())
            } else {
                LensError::Network(e)
            }
        }
        OpenAIError::ApiError(api) => classify_api_error(api),
        other => LensError::provider(other.to_string()),
    }
}

fn classify_api_error(api: ApiError) -> LensError {
    let kind = api.r#type.as_deref().unwrap_or_default().to_string();
    let haystack = format!("{kind} {}", api.message).to_lowercase();

    if haystack.contains("api key") || haystack.contains("authentication") {
        return LensError::credential(format!("{} (check OPENAI_API_KEY)", api.message));
    }
    if kind == "rate_limit_error" || haystack.contains("rate limit") || haystack.contains("quota")
    {
        return LensError::rate_limit(api.message);
    }
    if kind == "server_error"
        || haystack.contains("internal server")
        || haystack.contains("overloaded")
        || haystack.contains("service unavailable")
    {
        return LensError::service(api.message);
    }
    if kind == "invalid_request_error" {
        return LensError::invalid_request(api.message);
    }
    LensError::provider(api.message)
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn info(&self) -> Arc<ProviderInfo> {
        self.info.clone()
    }

    async fn complete(&self, req: CompletionRequest) -> Result<CompletionResponse, LensError> {
        let openai_req = self.build_request(&req)?;
        tracing::trace!(model = %req.model, "dispatching chat completion");

        let response = self
            .client
            .chat()
            .create(openai_req)
            .await
            .map_err(classify_error)?;

        Self::convert_response(response)
    }
}

/// Builder for the OpenAI provider.
///
/// An API key is mandatory; a missing key is reported as a credential error
/// here, before any call is attempted.
#[derive(Default)]
pub struct OpenAiBuilder {
    api_key: Option<String>,
    api_base: Option<String>,
    org_id: Option<String>,
}

impl OpenAiBuilder {
    /// Set API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set API base URL (for OpenAI-compatible APIs)
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set organization ID
    pub fn organization(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    /// Build the provider
    pub fn build(self) -> Result<OpenAiProvider, LensError> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LensError::credential(
                    "API key is not set; export OPENAI_API_KEY or add it to your .env file",
                )
            })?;

        let mut config = OpenAIConfig::new().with_api_key(api_key);

        if let Some(api_base) = self.api_base {
            config = config.with_api_base(api_base);
        }

        if let Some(org_id) = self.org_id {
            config = config.with_org_id(org_id);
        }

        let client = Client::with_config(config);

        Ok(OpenAiProvider {
            client,
            info: Arc::new(ProviderInfo {
                id: "openai".to_string(),
                name: "OpenAI".to_string(),
            }),
        })
    }
}
