//! Error types for duet modules using thiserror.

use thiserror::Error;

/// Fixed message shown to end users when every credential failed.
pub const EXHAUSTED_MESSAGE: &str =
    "Error: all API keys have hit their request limits or failed. Please try again later.";

/// How the retry loop should treat a failed completion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The endpoint refused the credential for rate or quota reasons.
    RateLimited,
    /// Network trouble, server errors, or an empty answer.
    Transient,
    /// The endpoint answered with something that is not a completion.
    Malformed,
}

/// Errors from a single completion call.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Rate limited by model endpoint (HTTP {status}): {message}")]
    RateLimited { status: u16, message: String },

    #[error("Model endpoint request failed: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Model endpoint returned an unreadable response: {0}")]
    Malformed(String),
}

impl CompletionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CompletionError::RateLimited { .. } => FailureKind::RateLimited,
            CompletionError::Malformed(_) => FailureKind::Malformed,
            CompletionError::EmptyResponse | CompletionError::Transport { .. } => {
                FailureKind::Transient
            }
        }
    }
}

/// Errors from language detection and translation.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Could not determine the language of the text")]
    Undetermined,

    #[error("Translation is not supported by this language service")]
    Unsupported,

    #[error("Translation service request failed: {0}")]
    Request(String),

    #[error("Translation service returned an unreadable response: {0}")]
    InvalidResponse(String),
}

/// Errors from loading settings and building clients.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No API keys configured. Set DUET_API_KEYS to a comma-separated list of tokens")]
    NoCredentials,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Errors surfaced by the text generator.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("All {attempts} completion attempts failed. Last error: {last_error}")]
    PoolExhausted {
        attempts: usize,
        #[source]
        last_error: CompletionError,
    },
}

impl GenerationError {
    /// Text suitable for showing in the chat instead of an answer.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationError::PoolExhausted { .. } => EXHAUSTED_MESSAGE,
        }
    }
}
