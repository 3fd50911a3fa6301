//! Story completion client.
//!
//! One generation is one chat completion with a fixed two-message
//! conversation. No retries; failures are returned to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use groq::{Groq, Message, Request, Response};
use tracing::{info, warn};

use crate::config::{AppConfig, ModelConfig};
use crate::error::{CompletionError, StoryError};
use crate::prompt::SYSTEM_PROMPT;

/// Anything that can answer a chat completion request.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: Request) -> Result<Response, groq::Error>;
}

#[async_trait]
impl CompletionBackend for Groq {
    async fn complete(&self, request: Request) -> Result<Response, groq::Error> {
        Groq::complete(self, request).await
    }
}

/// Generates story text through a completion backend.
///
/// Created once at startup and handed to the session; cloning shares the
/// underlying client.
#[derive(Clone)]
pub struct StoryGenerator {
    backend: Arc<dyn CompletionBackend>,
}

impl StoryGenerator {
    pub fn new(backend: impl CompletionBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Build a Groq-backed generator, failing when no credential is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, StoryError> {
        let mut client = Groq::new(config.require_api_key()?);
        if let Some(base_url) = &config.groq_base_url {
            client = client.with_base_url(base_url);
        }
        Ok(Self::new(client))
    }

    /// The exact request sent for `prompt`.
    pub fn build_request(prompt: &str, config: &ModelConfig) -> Request {
        Request::new(vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)])
            .with_model(config.model_id.clone())
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
    }

    /// Request a story and return the trimmed text of the first choice.
    pub async fn generate_story(
        &self,
        prompt: &str,
        config: &ModelConfig,
    ) -> Result<String, CompletionError> {
        info!(
            model = %config.model_id,
            temperature = config.temperature,
            "requesting story"
        );

        let response = self
            .backend
            .complete(Self::build_request(prompt, config))
            .await
            .inspect_err(|e| warn!(error = %e, "story completion failed"))?;

        let text = response
            .first_text()
            .ok_or(CompletionError::NoChoices)?
            .trim();

        if text.is_empty() {
            return Err(CompletionError::EmptyCompletion);
        }

        info!(chars = text.len(), "story received");
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCompletion, MockReply};
    use groq::Role;

    fn config() -> ModelConfig {
        ModelConfig::new("Llama 3 70B", 0.4).unwrap()
    }

    #[test]
    fn test_request_has_two_messages() {
        let request = StoryGenerator::build_request("Describe the leaf", &config());

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "Describe the leaf");
        assert_eq!(request.model.as_deref(), Some("llama3-70b-8192"));
        assert_eq!(request.temperature, Some(0.4));
        assert_eq!(request.max_tokens, 1000);
    }

    #[tokio::test]
    async fn test_generate_trims_first_choice() {
        let mock = MockCompletion::new(vec![MockReply::text("\n  A tiny ant climbs.  \n")]);
        let generator = StoryGenerator::new(mock.clone());

        let story = generator.generate_story("prompt", &config()).await.unwrap();

        assert_eq!(story, "A tiny ant climbs.");
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_without_choices_fails() {
        let generator = StoryGenerator::new(MockCompletion::new(vec![MockReply::NoChoices]));
        let err = generator.generate_story("prompt", &config()).await.unwrap_err();
        assert!(matches!(err, CompletionError::NoChoices));
    }

    #[tokio::test]
    async fn test_generate_whitespace_only_fails() {
        let generator = StoryGenerator::new(MockCompletion::new(vec![MockReply::text("   ")]));
        let err = generator.generate_story("prompt", &config()).await.unwrap_err();
        assert!(matches!(err, CompletionError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_generate_propagates_api_error() {
        let generator = StoryGenerator::new(MockCompletion::new(vec![MockReply::api_error(
            429,
            "rate limited",
        )]));
        let err = generator.generate_story("prompt", &config()).await.unwrap_err();
        match err {
            CompletionError::Api(inner) => assert!(inner.is_rate_limited()),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_from_config_requires_key() {
        assert!(matches!(
            StoryGenerator::from_config(&AppConfig::default()),
            Err(StoryError::MissingCredential(_))
        ));
        assert!(StoryGenerator::from_config(&AppConfig::default().with_api_key("k")).is_ok());
    }
}
