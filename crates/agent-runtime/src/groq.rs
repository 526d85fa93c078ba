//! Groq LLM Provider
//!
//! Implementation of `LlmProvider` for Groq's hosted, OpenAI-compatible
//! chat-completions API. The provider is constructed from a user-supplied
//! credential; authentication and network failures surface at call time.

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{
        Completion, CompletionStream, FinishReason, GenerationOptions, LlmProvider,
        ModelInfo, ProviderInfo, StreamChunk, TokenUsage,
    },
};
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq provider configuration
#[derive(Clone, Debug)]
pub struct GroqConfig {
    /// API credential (Bearer token)
    pub api_key: String,

    /// API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 120,
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| AgentError::MissingCredential("GROQ_API_KEY is not set".into()))?;
        Ok(Self::new(api_key))
    }
}

/// Groq LLM provider
pub struct GroqProvider {
    http: reqwest::Client,
    config: GroqConfig,
}

impl GroqProvider {
    /// Create a new provider from a credential string
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(GroqConfig::new(api_key))
    }

    /// Create from configuration
    pub fn from_config(config: GroqConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { http, config }
    }

    /// Create from the `GROQ_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(GroqConfig::from_env()?))
    }

    /// Convert agent messages to wire format
    fn convert_messages(messages: &[Message]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::Tool => "user", // Tool results appear as user context
                };
                WireMessage {
                    role: role.into(),
                    content: m.content.clone(),
                }
            })
            .collect()
    }

    /// Build a chat-completions request body
    fn build_request(
        messages: &[Message],
        options: &GenerationOptions,
        stream: bool,
    ) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: options.model.clone(),
            messages: Self::convert_messages(messages),
            temperature: options.temperature,
            top_p: options.top_p,
            max_tokens: options.max_tokens,
            stop: if options.stop_sequences.is_empty() {
                None
            } else {
                Some(options.stop_sequences.clone())
            },
            stream,
        }
    }

    /// Map an HTTP failure onto the error taxonomy
    async fn error_from_response(response: reqwest::Response) -> AgentError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => AgentError::Auth(body),
            429 => AgentError::RateLimited(body),
            _ => AgentError::Provider(format!("HTTP {}: {}", status, body)),
        }
    }

    fn classify_transport_error(e: reqwest::Error) -> AgentError {
        if e.is_timeout() || e.is_connect() {
            AgentError::ProviderUnavailable(e.to_string())
        } else {
            AgentError::Provider(e.to_string())
        }
    }

    fn convert_finish_reason(reason: Option<&str>) -> Option<FinishReason> {
        reason.map(|r| match r {
            "length" => FinishReason::Length,
            "tool_calls" | "function_call" => FinishReason::ToolUse,
            "content_filter" => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        })
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        let models = self.list_models().await.unwrap_or_default();

        Ok(ProviderInfo {
            name: "Groq".into(),
            models,
            supports_streaming: true,
            supports_tools: false, // tool use goes through the prompt protocol
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Groq health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = Self::build_request(messages, options, false);
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(Self::classify_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Provider("response contained no choices".into()))?;

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            model: body.model,
            usage: body.usage.map(TokenUsage::from),
            finish_reason: Self::convert_finish_reason(choice.finish_reason.as_deref()),
        })
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CompletionStream> {
        let request = Self::build_request(messages, options, true);
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(Self::classify_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let events = response.bytes_stream().eventsource();

        let mapped = events.map(|result| match result {
            Ok(event) => {
                if event.data.trim() == "[DONE]" {
                    return Ok(StreamChunk {
                        delta: String::new(),
                        done: true,
                        usage: None,
                    });
                }

                match serde_json::from_str::<StreamResponse>(&event.data) {
                    Ok(chunk) => {
                        let choice = chunk.choices.first();
                        Ok(StreamChunk {
                            delta: choice
                                .and_then(|c| c.delta.content.clone())
                                .unwrap_or_default(),
                            done: choice
                                .map(|c| c.finish_reason.is_some())
                                .unwrap_or(false),
                            usage: chunk.usage.map(TokenUsage::from),
                        })
                    }
                    Err(e) => Err(AgentError::Parse(e.to_string())),
                }
            }
            Err(e) => Err(AgentError::Provider(e.to_string())),
        });

        Ok(Box::pin(mapped))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(Self::classify_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: ModelListResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        Ok(body
            .data
            .into_iter()
            .map(|m| ModelInfo {
                name: m.id.clone(),
                id: m.id,
                context_length: m.context_window,
            })
            .collect())
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<ChoiceMessage>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    message: WireResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamResponse {
    choices: Vec<ChoiceDelta>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceDelta {
    delta: WireDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl From<WireUsage> for TokenUsage {
    fn from(u: WireUsage) -> Self {
        Self {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    data: Vec<WireModel>,
}

#[derive(Debug, Deserialize)]
struct WireModel {
    id: String,
    context_window: Option<u32>,
}
