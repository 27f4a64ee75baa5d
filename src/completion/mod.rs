//! Chat completion requests against an OpenAI-compatible endpoint.

pub mod client;
pub mod request;

pub use client::{CompletionBackend, HttpCompletionClient};
pub use request::{CompletionRequest, DEFAULT_TEMPERATURE};
