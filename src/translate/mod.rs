// Remote translation client
//
// The pipeline talks to a `Translator`; the production implementation sends one
// chat-completion request per call:
// - prompts: system prompt for the Persian localizer persona
// - chat: request/response types and the HTTP client

pub mod chat;
pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;

pub use chat::ChatCompletionTranslator;
use crate::config::{Credentials, TranslateConfig};
use crate::error::{CredentialKind, Result, TranslationError};

/// One remote translation per call, no retries
#[async_trait]
pub trait Translator: Send + Sync {
    /// Precondition check, performed once before a pass starts
    fn ensure_ready(&self) -> Result<()>;

    /// Translate `text` into Persian.
    ///
    /// `text` is always non-blank; `style_instructions` is user-authored text
    /// appended to the system prompt.
    async fn translate(
        &self,
        text: &str,
        style_instructions: Option<&str>,
        temperature: f32,
    ) -> std::result::Result<String, TranslationError>;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Build the chat-completion translator from config and environment secrets.
    ///
    /// A missing key is not an error here; `ensure_ready` reports it when a
    /// run is requested.
    pub fn create_translator(
        config: TranslateConfig,
        credentials: &Credentials,
    ) -> Result<Arc<dyn Translator>> {
        let api_key = credentials.require(CredentialKind::Translation).ok().map(str::to_string);
        Ok(Arc::new(ChatCompletionTranslator::new(config, api_key)?))
    }
}
