//! LLM service — capability layer.
//!
//! One capability: issue a structured-output call and hand back the raw
//! response text. A call is a natural-language prompt plus an optional
//! machine-checkable response schema; the schema constrains the model but
//! the result is still untrusted text, validated by whichever contract
//! consumes it.
//!
//! ## Transport
//! - `async-openai` against any OpenAI-compatible endpoint
//! - endpoint and model come from [`Config`]

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::recommendation::GroundingSource;

/// One structured-output request.
#[derive(Debug, Clone, Copy)]
pub struct LlmRequest<'a> {
    pub prompt: &'a str,
    pub system: Option<&'a str>,
    /// Response schema the model is instructed to conform to; `None` for
    /// free-form replies (chat)
    pub schema: Option<&'a JsonValue>,
}

/// Raw outcome of a structured-output call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Untrusted response text
    pub text: String,
    /// Source citations, when the backend grounds its answer. Metadata only.
    pub sources: Vec<GroundingSource>,
}

/// Capability: the abstract structured-generation call the contracts build on.
#[allow(async_fn_in_trait)]
pub trait StructuredGenerate {
    async fn structured_generate(&self, request: LlmRequest<'_>) -> Result<LlmResponse>;
}

/// Production implementation over an OpenAI-compatible chat endpoint.
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    fn transport_error(detail: impl std::fmt::Display) -> Error {
        Error::LlmCall { detail: detail.to_string() }
    }
}

impl StructuredGenerate for LlmService {
    async fn structured_generate(&self, request: LlmRequest<'_>) -> Result<LlmResponse> {
        debug!("calling LLM, model: {}", self.model_name);
        debug!("prompt length: {} chars", request.prompt.len());

        let mut messages = Vec::new();

        if let Some(system) = request.system {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(Self::transport_error)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        // The schema rides inside the prompt; chat-completion endpoints have
        // no separate response-schema channel.
        let content = match request.schema {
            Some(schema) => format!(
                "{}\n\nRespond ONLY with JSON conforming to this schema, with no surrounding text:\n{}",
                request.prompt, schema
            ),
            None => request.prompt.to_string(),
        };

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(Self::transport_error)?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.3)
            .build()
            .map_err(Self::transport_error)?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            warn!("LLM call failed: {}", e);
            Self::transport_error(e)
        })?;

        debug!("LLM call succeeded");

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| Self::transport_error("empty response"))?;

        // An OpenAI-compatible endpoint carries no grounding metadata.
        Ok(LlmResponse { text: text.trim().to_string(), sources: Vec::new() })
    }
}
