//! Text generation over a pool of credentials.
//!
//! [`TextGenerator`] drives one question through the whole pipeline:
//! detect the question's language, ask the model with the healthiest
//! credential, rotate and back off on failure, normalize the answer, and
//! translate it back if the model answered in a different language.

pub mod prompt;
pub mod retry;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::completion::{CompletionBackend, HttpCompletionClient};
use crate::config::{
    DEFAULT_ASSISTANT_LANGUAGE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, Settings,
};
use crate::credentials::{Credential, CredentialHealth, CredentialId, CredentialRotator};
use crate::error::{ConfigError, GenerationError};
use crate::language::{self, DEFAULT_LANGUAGE, LanguageService, Script};
use crate::normalize::{Normalizer, NormalizerConfig};

pub use prompt::{build_request, build_system_directive};
pub use retry::BackoffPolicy;

/// Model and formatting choices for a [`TextGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    pub model: String,
    pub max_tokens: u32,
    /// Language the model is instructed to answer in.
    pub assistant_language: String,
    pub backoff: BackoffPolicy,
    pub normalizer: NormalizerConfig,
}

impl GeneratorOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            assistant_language: settings.assistant_language.clone(),
            backoff: BackoffPolicy::default(),
            normalizer: NormalizerConfig::for_script(Script::for_language(
                &settings.assistant_language,
            )),
        }
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            assistant_language: DEFAULT_ASSISTANT_LANGUAGE.to_string(),
            backoff: BackoffPolicy::default(),
            normalizer: NormalizerConfig::for_script(Script::for_language(
                DEFAULT_ASSISTANT_LANGUAGE,
            )),
        }
    }
}

/// Answers questions using a fixed pool of credentials.
///
/// Credential health lives as long as the generator. The generator is
/// `Send + Sync`; concurrent callers share the pool through an internal lock
/// that is never held across a network call.
pub struct TextGenerator {
    backend: Arc<dyn CompletionBackend>,
    language: Arc<dyn LanguageService>,
    rotator: Mutex<CredentialRotator>,
    normalizer: Normalizer,
    options: GeneratorOptions,
}

impl TextGenerator {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        language: Arc<dyn LanguageService>,
        credentials: Vec<Credential>,
        options: GeneratorOptions,
    ) -> Result<Self, ConfigError> {
        let rotator = CredentialRotator::new(credentials)?;
        Ok(Self {
            backend,
            language,
            rotator: Mutex::new(rotator),
            normalizer: Normalizer::new(options.normalizer),
            options,
        })
    }

    /// Build a generator talking to the endpoints named in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let backend = HttpCompletionClient::new(&settings.api_base, settings.request_timeout)?;
        let language =
            language::language_service(settings.translate_url.as_deref(), settings.request_timeout)?;
        let credentials = settings.api_keys.iter().map(Credential::new).collect();

        Self::new(
            Arc::new(backend),
            language,
            credentials,
            GeneratorOptions::from_settings(settings),
        )
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Number of credentials, which is also the attempt budget per question.
    pub fn pool_size(&self) -> usize {
        self.lock_rotator().len()
    }

    /// Health of `id`, or `None` if it is not in the pool.
    pub fn credential_health(&self, id: CredentialId) -> Option<CredentialHealth> {
        self.lock_rotator().health(id)
    }

    /// Answer `question` with the configured token limit.
    pub async fn generate_text(
        &self,
        question: &str,
        thinking: bool,
    ) -> Result<String, GenerationError> {
        self.generate_text_with_limit(question, thinking, self.options.max_tokens)
            .await
    }

    /// Answer `question`, trying each credential at most once in the worst case.
    ///
    /// Failed attempts demote the credential, wait (longer when rate limited)
    /// and move on. Once every attempt has failed the result is
    /// [`GenerationError::PoolExhausted`].
    ///
    /// A completion is a success once the endpoint returns text, even if
    /// normalization strips all of it. Such an answer comes back as `Ok("")`
    /// and hosts decide how to show it.
    pub async fn generate_text_with_limit(
        &self,
        question: &str,
        thinking: bool,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let question_language = self.detect_language(question).await;
        let request = build_request(
            question,
            thinking,
            &self.options.assistant_language,
            &self.options.model,
            max_tokens,
        );

        let max_retries = self.pool_size();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let (id, credential) = {
                let mut rotator = self.lock_rotator();
                let (id, credential) = rotator.best_credential();
                (id, credential.clone())
            };
            debug!(credential = %id, attempt, max_retries, "Requesting completion");

            match self.backend.complete(&request, &credential).await {
                Ok(raw) => {
                    self.lock_rotator().record_success(id);
                    let normalized = self.normalizer.normalize(&raw);
                    info!(credential = %id, attempt, "Completion succeeded");
                    return Ok(self.match_language(normalized, &question_language).await);
                }
                Err(err) => {
                    warn!(credential = %id, attempt, error = %err, "Completion attempt failed");
                    self.lock_rotator().record_failure(id);

                    if attempt >= max_retries {
                        return Err(GenerationError::PoolExhausted {
                            attempts: attempt,
                            last_error: err,
                        });
                    }

                    tokio::time::sleep(self.options.backoff.delay_for(err.kind())).await;
                    self.lock_rotator().advance();
                }
            }
        }
    }

    /// Translate `answer` into the question's language when they differ.
    ///
    /// Questions in the default language are answered as-is. A failed
    /// translation returns the untranslated answer.
    async fn match_language(&self, answer: String, question_language: &str) -> String {
        if answer.is_empty() || question_language == DEFAULT_LANGUAGE {
            return answer;
        }

        let answer_language = self.detect_language(&answer).await;
        if answer_language == question_language {
            return answer;
        }

        debug!(from = %answer_language, to = %question_language, "Translating answer");
        match self
            .language
            .translate(&answer, None, question_language)
            .await
        {
            Ok(translated) => translated,
            Err(e) => {
                warn!("Translation to {} failed: {}. Returning untranslated answer", question_language, e);
                answer
            }
        }
    }

    async fn detect_language(&self, text: &str) -> String {
        match self.language.detect(text).await {
            Ok(code) => code,
            Err(e) => {
                debug!("Language detection failed: {}. Assuming {}", e, DEFAULT_LANGUAGE);
                DEFAULT_LANGUAGE.to_string()
            }
        }
    }

    fn lock_rotator(&self) -> MutexGuard<'_, CredentialRotator> {
        self.rotator.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
