//! Startup configuration.
//!
//! Values come from the process environment (the binary loads `.env` first).
//! A missing credential is recorded rather than rejected here, so the UI can
//! start and report it.

use serde::Serialize;

use crate::error::StoryError;
use crate::models::{resolve_model_id, DEFAULT_MODEL_ID};

pub const API_KEY_VAR: &str = groq::API_KEY_VAR;
pub const BASE_URL_VAR: &str = "GROQ_BASE_URL";
pub const TTS_LANG_VAR: &str = "STORY_TTS_LANG";
pub const TTS_TLD_VAR: &str = "STORY_TTS_TLD";
pub const TTS_URL_VAR: &str = "STORY_TTS_URL";

/// Token budget for every completion.
pub const MAX_TOKENS: usize = 1000;

/// Temperature the form starts with.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Speech service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechConfig {
    /// Language code, e.g. "en".
    pub lang: String,
    /// Top-level domain of the speech host, e.g. "com" or "co.uk".
    pub tld: String,
    /// Full base URL; overrides `tld` when set.
    pub base_url: Option<String>,
}

impl SpeechConfig {
    pub fn endpoint(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://translate.google.{}", self.tld))
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            tld: "com".to_string(),
            base_url: None,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub groq_api_key: Option<String>,
    pub groq_base_url: Option<String>,
    pub speech: SpeechConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = SpeechConfig::default();

        Self {
            groq_api_key: non_blank(API_KEY_VAR),
            groq_base_url: non_blank(BASE_URL_VAR),
            speech: SpeechConfig {
                lang: non_blank(TTS_LANG_VAR).unwrap_or(defaults.lang),
                tld: non_blank(TTS_TLD_VAR).unwrap_or(defaults.tld),
                base_url: non_blank(TTS_URL_VAR),
            },
        }
    }

    /// Set the completion credential.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.groq_api_key = Some(key.into());
        self
    }

    /// The credential, or the configuration error to show the user.
    pub fn require_api_key(&self) -> Result<&str, StoryError> {
        self.groq_api_key
            .as_deref()
            .ok_or(StoryError::MissingCredential(API_KEY_VAR))
    }
}

/// Per-request model settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelConfig {
    pub model_id: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl ModelConfig {
    /// Resolve `display_name` through the registry and clamp temperature
    /// into `[0.0, 1.0]`.
    pub fn new(display_name: &str, temperature: f32) -> Result<Self, StoryError> {
        let model_id = resolve_model_id(display_name)?;
        let temperature = if temperature.is_nan() {
            DEFAULT_TEMPERATURE
        } else {
            temperature.clamp(0.0, 1.0)
        };

        Ok(Self {
            model_id: model_id.to_string(),
            temperature,
            max_tokens: MAX_TOKENS,
        })
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}
