use std::fmt;

use thiserror::Error;

/// Which of the two secrets a precondition check found missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// Bearer token for the TMDB API
    Retrieval,
    /// API key for the chat-completion endpoint
    Translation,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retrieval => write!(f, "TMDB API key"),
            Self::Translation => write!(f, "OpenAI API key"),
        }
    }
}

/// Failure of a single remote translation call
#[derive(Error, Debug, Clone, PartialEq)]
pub struct TranslationError {
    /// HTTP status of the response, absent for transport failures
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "translation API error {}: {}", status, self.message),
            None => write!(f, "translation request failed: {}", self.message),
        }
    }
}

impl TranslationError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self { status: None, message: message.into() }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self { status: Some(status), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum TarjomeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0} is missing. Please check your environment variables.")]
    MissingCredential(CredentialKind),

    #[error("No content available to translate")]
    NoContent,

    #[error("Please enter a search query")]
    EmptyQuery,

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    #[error("A translation is already in progress")]
    RunInFlight,

    #[error("Translation run was cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TarjomeError {
    /// True for errors raised before any remote call was attempted
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential(_) | Self::NoContent | Self::EmptyQuery
        )
    }
}

pub type Result<T> = std::result::Result<T, TarjomeError>;
