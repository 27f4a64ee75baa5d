//! HTTP completion client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::credentials::Credential;
use crate::error::{CompletionError, ConfigError};

use super::request::{ChatCompletionBody, ChatCompletionResponse, CompletionRequest};

/// Longest slice of an error body kept in a failure message.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Trait for issuing a single completion call.
///
/// This abstraction allows mocking the model endpoint in tests.
/// Implementations never retry; retrying is the generator's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send `request` authenticated with `credential` and return the raw text.
    async fn complete(
        &self,
        request: &CompletionRequest,
        credential: &Credential,
    ) -> Result<String, CompletionError>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct HttpCompletionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpCompletionClient {
    /// Build a client for `api_base` (e.g. `https://router.huggingface.co/v1`).
    ///
    /// `timeout` bounds each request, including reading the body.
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
        credential: &Credential,
    ) -> Result<String, CompletionError> {
        let body = ChatCompletionBody::from(request);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;

        let content = parsed.into_content()?;
        debug!(chars = content.chars().count(), "Received completion");
        Ok(content)
    }
}

/// Map a non-success HTTP status to a structured failure.
fn classify_status(status: StatusCode, body: &str) -> CompletionError {
    let message = truncate_body(body);
    match status {
        // 402 is how the router reports an exhausted credit quota.
        StatusCode::TOO_MANY_REQUESTS | StatusCode::PAYMENT_REQUIRED => {
            CompletionError::RateLimited {
                status: status.as_u16(),
                message,
            }
        }
        _ => CompletionError::Transport {
            status: Some(status.as_u16()),
            message: format!("HTTP {}: {}", status.as_u16(), message),
        },
    }
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        let head: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn too_many_requests_is_rate_limited() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, "Rate limit reached");
        assert_eq!(err.kind(), FailureKind::RateLimited);
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn payment_required_is_treated_as_quota() {
        let err = classify_status(StatusCode::PAYMENT_REQUIRED, "credits exhausted");
        assert_eq!(err.kind(), FailureKind::RateLimited);
    }

    #[test]
    fn server_errors_are_transient() {
        let err = classify_status(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.kind(), FailureKind::Transient);
        match err {
            CompletionError::Transport { status, message } => {
                assert_eq!(status, Some(502));
                assert!(message.contains("upstream down"));
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[test]
    fn unauthorized_is_transient_not_rate_limited() {
        let err = classify_status(StatusCode::UNAUTHORIZED, "invalid token");
        assert_eq!(err.kind(), FailureKind::Transient);
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_CHARS + 100);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.chars().count(), MAX_ERROR_BODY_CHARS + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client =
            HttpCompletionClient::new("https://router.example/v1/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.endpoint(), "https://router.example/v1/chat/completions");
    }
}
