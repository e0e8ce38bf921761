//! OpenAI-compatible chat completions provider
//!
//! Speaks the `/chat/completions` protocol, which covers OpenAI itself, local
//! servers (LM Studio, vLLM, llama.cpp) and Gemini's OpenAI-compatible
//! endpoint. See: https://platform.openai.com/docs/api-reference/chat
//!
//! # Examples
//!
//! ```no_run
//! use pricelens_llm::{CompletionRequest, LLMProvider, Message};
//! use pricelens_llm::providers::{OpenAIConfig, OpenAIProvider};
//!
//! # async fn example() -> pricelens_llm::Result<()> {
//! let provider = OpenAIProvider::with_config(OpenAIConfig::gemini("your-google-key"))?;
//!
//! let request = CompletionRequest::builder("gemini-2.0-flash")
//!     .system("You are a financial assistant.")
//!     .add_message(Message::user("What is the current price of Infosys?"))
//!     .temperature(0.2)
//!     .build();
//!
//! let response = provider.complete(request).await?;
//! println!("{}", response.message.text());
//! # Ok(())
//! # }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, FinishReason, LLMError, LLMProvider, Message, Result,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
/// Gemini's OpenAI-compatible endpoint
pub const GEMINI_OPENAI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the OpenAI-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key sent as a bearer token
    pub api_key: String,

    /// Base URL for the API (default: "https://api.openai.com/v1")
    pub api_base: String,

    /// HTTP client timeout in seconds (default: 60)
    pub timeout_secs: u64,

    /// Name reported by [`LLMProvider::name`]
    pub provider_name: String,
}

impl OpenAIConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            provider_name: "openai".to_string(),
        }
    }

    /// Config targeting Gemini through its OpenAI-compatible endpoint
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self {
            api_base: GEMINI_OPENAI_API_BASE.to_string(),
            provider_name: "gemini".to_string(),
            ..Self::new(api_key)
        }
    }

    /// Create config from environment variables
    ///
    /// `GOOGLE_API_KEY` selects Gemini; otherwise `OPENAI_API_KEY` is used.
    /// `OPENAI_API_BASE` overrides the endpoint in either case.
    pub fn from_env() -> Result<Self> {
        let mut config = match pricelens_utils::var("GOOGLE_API_KEY") {
            Some(key) => Self::gemini(key),
            None => Self::new(pricelens_utils::require_var("OPENAI_API_KEY")?),
        };

        if let Some(base) = pricelens_utils::var("OPENAI_API_BASE") {
            config.api_base = base;
        }
        if let Some(timeout) = pricelens_utils::parse_var::<u64>("OPENAI_TIMEOUT_SECS")? {
            config.timeout_secs = timeout;
        }

        Ok(config)
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the provider name reported in logs
    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base).map_err(|e| {
            LLMError::ConfigurationError(format!("invalid api_base '{}': {e}", self.api_base))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LLMError::ConfigurationError(format!(
                "api_base must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(LLMError::ConfigurationError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// OpenAI-compatible provider
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    /// Create a provider from a validated configuration
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(OpenAIConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(
        skip(self, request),
        fields(provider = %self.config.provider_name, model = %request.model)
    )]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending chat completion to {}", self.config.api_base);

        let model = request.model.clone();
        let wire_request = ChatRequest::from(request);

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&wire_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, body, model));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

        let completion = parse_chat_response(chat_response)?;
        debug!(
            finish_reason = ?completion.finish_reason,
            total_tokens = ?completion.usage.map(|u| u.total()),
            "Received completion"
        );
        Ok(completion)
    }

    fn name(&self) -> &str {
        &self.config.provider_name
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

impl From<CompletionRequest> for ChatRequest {
    /// The system instruction becomes the leading `system` message
    fn from(request: CompletionRequest) -> Self {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: Some(system),
            });
        }
        messages.extend(request.messages.into_iter().map(|m| ChatMessage {
            role: m.role.as_str().to_string(),
            content: Some(m.content),
        }));

        Self {
            model: request.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

fn parse_chat_response(response: ChatResponse) -> Result<CompletionResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

    Ok(CompletionResponse {
        message: Message::assistant(choice.message.content.unwrap_or_default()),
        finish_reason: FinishReason::from_wire(choice.finish_reason.as_deref()),
        usage: response.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        }),
    })
}

fn map_status_error(status: StatusCode, body: String, model: String) -> LLMError {
    match status.as_u16() {
        401 | 403 => LLMError::AuthenticationFailed,
        429 => LLMError::RateLimitExceeded(body),
        400 => LLMError::InvalidRequest(body),
        404 => LLMError::ModelNotFound(model),
        408 | 504 => LLMError::Timeout(format!("HTTP {status}")),
        _ => LLMError::RequestFailed(format!("HTTP {status}: {body}")),
    }
}
