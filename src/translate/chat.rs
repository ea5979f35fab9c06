use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Translator, prompts::build_system_prompt};
use crate::config::TranslateConfig;
use crate::error::{CredentialKind, Result, TarjomeError, TranslationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(model: &str, system_prompt: String, text: &str, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: system_prompt },
                ChatMessage { role: "user".to_string(), content: text.to_string() },
            ],
            max_tokens,
            temperature,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Translator backed by an OpenAI-compatible chat-completion endpoint
pub struct ChatCompletionTranslator {
    client: Client,
    config: TranslateConfig,
    api_key: Option<String>,
}

impl ChatCompletionTranslator {
    pub fn new(config: TranslateConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config, api_key })
    }
}

#[async_trait]
impl Translator for ChatCompletionTranslator {
    fn ensure_ready(&self) -> Result<()> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(TarjomeError::MissingCredential(CredentialKind::Translation)),
        }
    }

    async fn translate(
        &self,
        text: &str,
        style_instructions: Option<&str>,
        temperature: f32,
    ) -> std::result::Result<String, TranslationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TranslationError::transport("API key is not configured"))?;

        let request = ChatRequest::new(
            &self.config.model,
            build_system_prompt(style_instructions),
            text,
            self.config.max_tokens,
            temperature,
        );

        debug!("Sending translation request to: {}", self.config.endpoint);

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslationError::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::status(status.as_u16(), provider_error_message(&body)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::transport(format!("Failed to parse response: {}", e)))?;

        extract_translation(body)
    }
}

/// Message from an `{"error": {"message": ..}}` body, or "Unknown error"
fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| "Unknown error".to_string())
}

/// Trimmed content of the first choice
fn extract_translation(response: ChatResponse) -> std::result::Result<String, TranslationError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| TranslationError::transport("Response contained no choices"))?;

    let translation = content.trim();
    if translation.is_empty() {
        return Err(TranslationError::transport("Empty translation received"));
    }
    Ok(translation.to_string())
}
