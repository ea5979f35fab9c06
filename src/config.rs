use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{CredentialKind, Result, TarjomeError};

/// Environment variable holding the TMDB bearer token
pub const RETRIEVAL_KEY_ENV: &str = "TMDB_API_KEY";
/// Environment variable holding the chat-completion API key
pub const TRANSLATION_KEY_ENV: &str = "OPENAI_API_KEY";

fn default_max_tokens() -> u32 {
    1000
}

fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub translate: TranslateConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Chat-completion endpoint URL
    pub endpoint: String,
    /// Model to use for translation
    pub model: String,
    /// Upper bound on tokens generated per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for the inline flow (general fields)
    pub inline_temperature: f32,
    /// Temperature for the storyteller flow on the detail view
    pub storyteller_temperature: f32,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// What happens to an in-flight call when its run is superseded or cancelled
    #[serde(default)]
    pub cancel_mode: CancelMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelMode {
    /// Stop at the next unit boundary; a call already sent runs to completion
    #[default]
    Cosmetic,
    /// Drop the in-flight call as soon as the run is cancelled
    Abort,
}

/// Which caller flow is asking for a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationFlow {
    /// Quick translation of general fields
    Inline,
    /// Narrative translation on the dedicated detail view
    Storyteller,
}

impl TranslateConfig {
    pub fn temperature_for(&self, flow: TranslationFlow) -> f32 {
        match flow {
            TranslationFlow::Inline => self.inline_temperature,
            TranslationFlow::Storyteller => self.storyteller_temperature,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// TMDB API base URL
    pub base_url: String,
    /// Response language requested from TMDB
    pub language: String,
    /// Whether adult titles are included in search results
    pub include_adult: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translate: TranslateConfig {
                endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
                model: "gpt-4o-mini".to_string(),
                max_tokens: default_max_tokens(),
                inline_temperature: 0.3,
                storyteller_temperature: 0.9,
                timeout_secs: default_timeout_secs(),
                cancel_mode: CancelMode::Cosmetic,
            },
            retrieval: RetrievalConfig {
                base_url: "https://api.themoviedb.org/3".to_string(),
                language: "en-US".to_string(),
                include_adult: false,
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TarjomeError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| TarjomeError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TarjomeError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TarjomeError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

/// The two secrets, read from the environment and never persisted
#[derive(Clone, Default)]
pub struct Credentials {
    pub retrieval_token: Option<String>,
    pub translation_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("retrieval_token", &self.retrieval_token.as_ref().map(|_| "<redacted>"))
            .field("translation_key", &self.translation_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as missing
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            retrieval_token: read(RETRIEVAL_KEY_ENV),
            translation_key: read(TRANSLATION_KEY_ENV),
        }
    }

    pub fn require(&self, kind: CredentialKind) -> Result<&str> {
        let value = match kind {
            CredentialKind::Retrieval => self.retrieval_token.as_deref(),
            CredentialKind::Translation => self.translation_key.as_deref(),
        };
        value.ok_or(TarjomeError::MissingCredential(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_temperatures_per_flow() {
        let config = Config::default();
        assert_eq!(config.translate.temperature_for(TranslationFlow::Inline), 0.3);
        assert_eq!(config.translate.temperature_for(TranslationFlow::Storyteller), 0.9);
        assert_eq!(config.translate.max_tokens, 1000);
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tarjome.toml");

        let mut config = Config::default();
        config.translate.cancel_mode = CancelMode::Abort;
        config.retrieval.language = "fa-IR".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.translate.cancel_mode, CancelMode::Abort);
        assert_eq!(loaded.retrieval.language, "fa-IR");
        assert_eq!(loaded.translate.model, "gpt-4o-mini");
    }

    #[test]
    fn test_optional_fields_fall_back_to_defaults() {
        let toml = r#"
            [translate]
            endpoint = "http://localhost:8080/v1/chat/completions"
            model = "local"
            inline_temperature = 0.2
            storyteller_temperature = 0.8

            [retrieval]
            base_url = "http://localhost:9000/3"
            language = "en-US"
            include_adult = false
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.translate.max_tokens, 1000);
        assert_eq!(config.translate.cancel_mode, CancelMode::Cosmetic);
    }

    #[test]
    fn test_credentials_blank_values_are_missing() {
        let creds = Credentials::from_lookup(|name| match name {
            RETRIEVAL_KEY_ENV => Some("  ".to_string()),
            TRANSLATION_KEY_ENV => Some("sk-test".to_string()),
            _ => None,
        });
        assert!(matches!(
            creds.require(CredentialKind::Retrieval),
            Err(TarjomeError::MissingCredential(CredentialKind::Retrieval))
        ));
        assert_eq!(creds.require(CredentialKind::Translation).unwrap(), "sk-test");
        assert!(!format!("{:?}", creds).contains("sk-test"));
    }
}
