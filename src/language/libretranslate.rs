//! Client for a LibreTranslate-compatible translation service.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, TranslateError};

use super::LanguageService;

#[derive(Debug, Serialize)]
struct DetectBody<'a> {
    q: &'a str,
}

#[derive(Debug, Deserialize)]
struct Detection {
    language: String,
    #[serde(default)]
    confidence: f64,
}

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

/// Detects and translates through `POST /detect` and `POST /translate`.
pub struct LibreTranslateClient {
    http: reqwest::Client,
    base_url: String,
}

impl LibreTranslateClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, TranslateError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}/{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| TranslateError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Request(format!(
                "{} returned HTTP {}",
                path,
                status.as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TranslateError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LanguageService for LibreTranslateClient {
    async fn detect(&self, text: &str) -> Result<String, TranslateError> {
        let detections: Vec<Detection> = self.post("detect", &DetectBody { q: text }).await?;

        let best = detections
            .into_iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .ok_or(TranslateError::Undetermined)?;

        debug!(language = %best.language, confidence = best.confidence, "Detected language");
        Ok(best.language)
    }

    async fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, TranslateError> {
        let body = TranslateBody {
            q: text,
            source: source.unwrap_or("auto"),
            target,
            format: "text",
        };
        let translation: Translation = self.post("translate", &body).await?;
        Ok(translation.translated_text)
    }
}
