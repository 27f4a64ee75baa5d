//! Settings loaded from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;

/// Comma-separated access tokens for the model endpoint.
pub const API_KEYS_ENV_VAR: &str = "DUET_API_KEYS";
/// Base URL of the OpenAI-compatible endpoint.
pub const API_BASE_ENV_VAR: &str = "DUET_API_BASE";
pub const MODEL_ENV_VAR: &str = "DUET_MODEL";
pub const MAX_TOKENS_ENV_VAR: &str = "DUET_MAX_TOKENS";
/// Per-request timeout in seconds.
pub const TIMEOUT_ENV_VAR: &str = "DUET_TIMEOUT";
/// Language the assistant is instructed to answer in.
pub const LANGUAGE_ENV_VAR: &str = "DUET_LANGUAGE";
/// Optional LibreTranslate-compatible endpoint.
pub const TRANSLATE_URL_ENV_VAR: &str = "DUET_TRANSLATE_URL";

pub const DEFAULT_API_BASE: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_MODEL: &str = "HuggingFaceTB/SmolLM3-3B";
pub const DEFAULT_MAX_TOKENS: u32 = 2500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_ASSISTANT_LANGUAGE: &str = "ru";

/// Runtime settings for the text generator.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_keys: Vec<String>,
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub assistant_language: String,
    pub translate_url: Option<String>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_keys", &format_args!("[{} redacted]", self.api_keys.len()))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout", &self.request_timeout)
            .field("assistant_language", &self.assistant_language)
            .field("translate_url", &self.translate_url)
            .finish()
    }
}

impl Settings {
    /// Read settings from `DUET_*` environment variables.
    ///
    /// Only `DUET_API_KEYS` is required. Invalid numeric values are logged
    /// and replaced by their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_keys = parse_api_keys(&env::var(API_KEYS_ENV_VAR).unwrap_or_default());
        if api_keys.is_empty() {
            return Err(ConfigError::NoCredentials);
        }

        Ok(Self {
            api_keys,
            api_base: env_string(API_BASE_ENV_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: env_string(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: env_parsed(MAX_TOKENS_ENV_VAR, DEFAULT_MAX_TOKENS),
            request_timeout: Duration::from_secs(env_parsed(
                TIMEOUT_ENV_VAR,
                DEFAULT_TIMEOUT_SECS,
            )),
            assistant_language: env_string(LANGUAGE_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_ASSISTANT_LANGUAGE.to_string()),
            translate_url: env_string(TRANSLATE_URL_ENV_VAR),
        })
    }
}

/// Split a comma-separated key list, ignoring blanks and surrounding spaces.
pub fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_string(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parsed<T>(var: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    match env_string(var) {
        Some(v) => match v.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid {} value '{}', using default {}", var, v, default);
                default
            }
        },
        None => default,
    }
}
