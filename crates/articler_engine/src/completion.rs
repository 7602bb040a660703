use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CompletionSettings;
use crate::prompt::{build_prompt, PromptVariation, SYSTEM_PROMPT};

/// Inputs for generating the text of one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub main_keyword: String,
    pub main_link: String,
    pub sub1: String,
    pub sub2: String,
}

/// Per-call failure. Never fatal to a job; the message ends up inline in
/// the article.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("missing completion service credential (OPENROUTER_API_KEY is not set)")]
    MissingCredential,
    #[error("request timed out")]
    Timeout,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    async fn generate(
        &self,
        request: &CompletionRequest,
        variation: &PromptVariation,
    ) -> Result<String, CompletionError>;
}

/// OpenAI-compatible chat completion client (OpenRouter by default).
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    settings: CompletionSettings,
    client: reqwest::Client,
}

impl OpenRouterClient {
    pub fn new(settings: CompletionSettings) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| CompletionError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait::async_trait]
impl CompletionService for OpenRouterClient {
    async fn generate(
        &self,
        request: &CompletionRequest,
        variation: &PromptVariation,
    ) -> Result<String, CompletionError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingCredential)?;

        let prompt = build_prompt(request, variation);
        let body = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: variation.temperature,
        };

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::HttpStatus(status.as_u16()));
        }

        let parsed: ChatResponse = response.json().await.map_err(|err| {
            if err.is_timeout() {
                CompletionError::Timeout
            } else {
                CompletionError::MalformedResponse(err.to_string())
            }
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                CompletionError::MalformedResponse("missing choices[0].message.content".into())
            })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        return CompletionError::Timeout;
    }
    CompletionError::Network(err.to_string())
}
