//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use duet::{
    BackoffPolicy, Credential, GeneratorOptions, HttpCompletionClient, ScriptDetector,
    TextGenerator,
};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_MODEL: &str = "test-model";

/// A chat completion response carrying `content` in its only choice.
pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": TEST_MODEL,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// An OpenAI-style error payload.
pub fn error_body(message: &str) -> Value {
    json!({ "error": { "message": message } })
}

/// Generator options without backoff delays, answering in Russian.
pub fn test_options() -> GeneratorOptions {
    GeneratorOptions {
        model: TEST_MODEL.to_string(),
        max_tokens: 100,
        backoff: BackoffPolicy::none(),
        ..GeneratorOptions::default()
    }
}

/// A generator pointed at `server` with one credential per key.
pub fn generator_for(server: &MockServer, keys: &[&str]) -> TextGenerator {
    let backend = HttpCompletionClient::new(&server.uri(), Duration::from_secs(5))
        .expect("Failed to build completion client");
    let credentials = keys.iter().map(|key| Credential::new(*key)).collect();

    TextGenerator::new(
        Arc::new(backend),
        Arc::new(ScriptDetector::new()),
        credentials,
        test_options(),
    )
    .expect("Failed to build generator")
}
