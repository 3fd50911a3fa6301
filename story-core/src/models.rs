//! Registry of supported completion models.
//!
//! Maps the display names shown in the model selector to Groq model ids.
//! Registry order is the selector order; the first entry is the default.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::StoryError;

/// Supported models as `(display name, provider id)`.
pub const SUPPORTED_MODELS: [(&str, &str); 10] = [
    ("Llama 3.2 1B (Preview)", "llama-3.2-1b-preview"),
    ("Llama 3 70B", "llama3-70b-8192"),
    ("Llama 3 8B", "llama3-8b-8192"),
    ("Llama 3.1 70B", "llama-3.1-70b-versatile"),
    ("Llama 3.1 8B", "llama-3.1-8b-instant"),
    ("Mixtral 8x7B", "mixtral-8x7b-32768"),
    ("Gemma 2 9B", "gemma2-9b-it"),
    ("LLaVA 1.5 7B", "llava-v1.5-7b-4096-preview"),
    ("Llama 3.2 3B (Preview)", "llama-3.2-3b-preview"),
    ("Llama 3.2 11B Vision (Preview)", "llama-3.2-11b-vision-preview"),
];

/// Display name selected when nothing else is chosen.
pub const DEFAULT_MODEL: &str = SUPPORTED_MODELS[0].0;
pub const DEFAULT_MODEL_ID: &str = SUPPORTED_MODELS[0].1;

static REGISTRY: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| SUPPORTED_MODELS.iter().copied().collect());

/// Look up the provider model id for a display name.
pub fn resolve_model_id(display_name: &str) -> Result<&'static str, StoryError> {
    REGISTRY
        .get(display_name)
        .copied()
        .ok_or_else(|| StoryError::UnknownModel(display_name.to_string()))
}

/// Display names in registry order.
pub fn model_names() -> impl Iterator<Item = &'static str> {
    SUPPORTED_MODELS.iter().map(|(name, _)| *name)
}

/// Whether `model_id` is one of the registered provider ids.
pub fn is_registered_id(model_id: &str) -> bool {
    SUPPORTED_MODELS.iter().any(|(_, id)| *id == model_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_model() {
        assert_eq!(resolve_model_id("Llama 3 70B").unwrap(), "llama3-70b-8192");
        assert_eq!(resolve_model_id("Gemma 2 9B").unwrap(), "gemma2-9b-it");
    }

    #[test]
    fn test_every_registered_name_resolves() {
        for name in model_names() {
            let id = resolve_model_id(name).unwrap();
            assert!(!id.is_empty(), "{name} has empty id");
            assert!(is_registered_id(id));
        }
        assert_eq!(model_names().count(), 10);
    }

    #[test]
    fn test_unknown_model() {
        for name in ["GPT-4", "", "llama3-70b-8192", "llama 3 70b"] {
            match resolve_model_id(name) {
                Err(StoryError::UnknownModel(n)) => assert_eq!(n, name),
                other => panic!("expected UnknownModel for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_default_model_is_first() {
        assert_eq!(model_names().next(), Some(DEFAULT_MODEL));
        assert!(resolve_model_id(DEFAULT_MODEL).is_ok());
    }
}
