//! Summarization via a language model

use crate::config::PipelineConfig;
use crate::engine::TextAnswer;
use crate::error::{ProviderError, ProviderKind};
use crate::prompts::Prompt;
use pricelens_llm::{CompletionRequest, LLMProvider, Message};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Sends a composed [`Prompt`] to an LLM provider and returns its answer
#[derive(Clone)]
pub struct Summarizer {
    provider: Arc<dyn LLMProvider>,
    model: String,
    temperature: f32,
    max_tokens: usize,
    timeout: Duration,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &PipelineConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.llm_timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the completion request for `prompt`
    pub fn request(&self, prompt: &Prompt) -> CompletionRequest {
        CompletionRequest::builder(&self.model)
            .system(prompt.system_instruction.clone())
            .add_message(Message::user(prompt.user_instruction.clone()))
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
    }

    /// One completion call; the answer text is returned as-is
    #[instrument(skip(self, prompt), fields(model = %self.model, provider = self.provider.name()))]
    pub async fn summarize(&self, prompt: &Prompt) -> Result<TextAnswer, ProviderError> {
        let response = self
            .provider
            .complete(self.request(prompt))
            .await
            .map_err(|e| ProviderError::from_llm(e, self.timeout))?;

        let content = response.message.text();
        if content.trim().is_empty() {
            return Err(ProviderError::unexpected(
                ProviderKind::LanguageModel,
                "model returned an empty answer",
            ));
        }

        debug!(finish_reason = ?response.finish_reason, "Summarization complete");
        Ok(TextAnswer::new(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pricelens_llm::{CompletionResponse, FinishReason, LLMError};
    use std::sync::Mutex;

    /// Records the last request and replies with a fixed result
    struct ScriptedLlm {
        reply: Result<String, LLMError>,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl ScriptedLlm {
        fn replying(reply: Result<String, LLMError>) -> Self {
            Self {
                reply,
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedLlm {
        async fn complete(&self, request: CompletionRequest) -> pricelens_llm::Result<CompletionResponse> {
            *self.last_request.lock().unwrap() = Some(request);
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    message: Message::assistant(text.clone()),
                    finish_reason: FinishReason::Stop,
                    usage: None,
                }),
                Err(LLMError::AuthenticationFailed) => Err(LLMError::AuthenticationFailed),
                Err(LLMError::Timeout(detail)) => Err(LLMError::Timeout(detail.clone())),
                Err(other) => Err(LLMError::RequestFailed(other.to_string())),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn prompt() -> Prompt {
        Prompt {
            system_instruction: "You are a financial assistant.".to_string(),
            user_instruction: "What is the price?".to_string(),
        }
    }

    #[tokio::test]
    async fn test_summarize_passes_answer_through() {
        let llm = Arc::new(ScriptedLlm::replying(Ok("  Infosys trades at ₹1500.\n".to_string())));
        let summarizer = Summarizer::new(llm.clone(), &PipelineConfig::default());

        let answer = summarizer.summarize(&prompt()).await.unwrap();
        assert_eq!(answer.content, "  Infosys trades at ₹1500.\n");
        assert!(!answer.search_context_empty);

        let request = llm.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "gemini-2.0-flash");
        assert_eq!(request.system.as_deref(), Some("You are a financial assistant."));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].text(), "What is the price?");
        assert_eq!(request.temperature, Some(0.2));
    }

    #[tokio::test]
    async fn test_empty_answer_is_unexpected() {
        let llm = Arc::new(ScriptedLlm::replying(Ok("   ".to_string())));
        let summarizer = Summarizer::new(llm, &PipelineConfig::default());

        let err = summarizer.summarize(&prompt()).await.unwrap_err();
        assert!(matches!(err, ProviderError::UnexpectedResponse { .. }));
        assert_eq!(err.provider(), ProviderKind::LanguageModel);
    }

    #[tokio::test]
    async fn test_auth_failure_maps_to_provider_error() {
        let llm = Arc::new(ScriptedLlm::replying(Err(LLMError::AuthenticationFailed)));
        let summarizer = Summarizer::new(llm, &PipelineConfig::default());

        let err = summarizer.summarize(&prompt()).await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::Authentication {
                provider: ProviderKind::LanguageModel
            }
        );
    }

    #[tokio::test]
    async fn test_client_timeout_reports_configured_limit() {
        let llm = Arc::new(ScriptedLlm::replying(Err(LLMError::Timeout(
            "operation timed out".to_string(),
        ))));
        let config = PipelineConfig::builder()
            .llm_timeout(std::time::Duration::from_secs(45))
            .build()
            .unwrap();
        let summarizer = Summarizer::new(llm, &config);

        let err = summarizer.summarize(&prompt()).await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::Timeout {
                provider: ProviderKind::LanguageModel,
                timeout_ms: 45_000
            }
        );
    }
}
