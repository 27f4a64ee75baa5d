//! Language detection and translation.
//!
//! Both operations are best-effort. Callers treat a failed detection as the
//! default language and a failed translation as "keep the original text".

pub mod detect;
pub mod libretranslate;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ConfigError, TranslateError};

pub use detect::{Script, ScriptDetector, detect_script_language};
pub use libretranslate::LibreTranslateClient;

/// Language code assumed when detection fails.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Trait for detecting and translating text.
#[async_trait]
pub trait LanguageService: Send + Sync {
    /// Best guess at the language code of `text`.
    async fn detect(&self, text: &str) -> Result<String, TranslateError>;

    /// Translate `text` into `target`. A `None` source means auto-detect.
    async fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, TranslateError>;
}

/// Remote service whose detection falls back to the local script detector.
pub struct RemoteWithLocalDetection<S> {
    remote: S,
    local: ScriptDetector,
}

impl<S: LanguageService> RemoteWithLocalDetection<S> {
    pub fn new(remote: S) -> Self {
        Self {
            remote,
            local: ScriptDetector::new(),
        }
    }
}

#[async_trait]
impl<S: LanguageService> LanguageService for RemoteWithLocalDetection<S> {
    async fn detect(&self, text: &str) -> Result<String, TranslateError> {
        match self.remote.detect(text).await {
            Ok(language) => Ok(language),
            Err(e) => {
                debug!("Remote detection failed: {}. Using script detection", e);
                self.local.detect(text).await
            }
        }
    }

    async fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, TranslateError> {
        self.remote.translate(text, source, target).await
    }
}

/// Build the language service for an optional translation endpoint.
///
/// Without an endpoint only script detection is available and translation
/// always fails, leaving answers untranslated.
pub fn language_service(
    translate_url: Option<&str>,
    timeout: Duration,
) -> Result<Arc<dyn LanguageService>, ConfigError> {
    match translate_url {
        Some(url) => {
            let client = LibreTranslateClient::new(url, timeout)?;
            Ok(Arc::new(RemoteWithLocalDetection::new(client)))
        }
        None => Ok(Arc::new(ScriptDetector::new())),
    }
}
