//! duet - resilient text generation for a two-mode chat application.
//!
//! # Overview
//!
//! duet answers chat questions through an OpenAI-compatible model endpoint
//! using a pool of interchangeable API keys. Failing keys are demoted and
//! retried with backoff, and the raw model output is normalized into clean
//! paragraphs in the language the user asked in.

pub mod chat;
pub mod completion;
pub mod config;
pub mod credentials;
pub mod error;
pub mod generator;
pub mod language;
pub mod normalize;

// Re-export commonly used types
pub use chat::{ConversationTurn, Role};
pub use completion::{CompletionBackend, CompletionRequest, HttpCompletionClient};
pub use config::Settings;
pub use credentials::{Credential, CredentialHealth, CredentialId, CredentialRotator};
pub use error::{
    CompletionError, ConfigError, EXHAUSTED_MESSAGE, FailureKind, GenerationError, TranslateError,
};
pub use generator::{BackoffPolicy, GeneratorOptions, TextGenerator};
pub use language::{LanguageService, LibreTranslateClient, Script, ScriptDetector};
pub use normalize::{Normalizer, NormalizerConfig, clean_response, format_response};
