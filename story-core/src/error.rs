//! Error types for story generation and speech synthesis.

use thiserror::Error;

/// Failure of a single story completion call.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Api(#[from] groq::Error),

    #[error("completion service returned no choices")]
    NoChoices,

    #[error("completion service returned an empty story")]
    EmptyCompletion,
}

/// Failure of a single text-to-speech conversion.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("cannot synthesize speech from empty text")]
    EmptyText,

    #[error("speech service unreachable: {0}")]
    Network(String),

    #[error("speech service rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("speech service returned no audio")]
    EmptyAudio,

    #[error("failed to write audio file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("{0} not found in environment variables. Please set it and restart the app.")]
    MissingCredential(&'static str),

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("invalid {kind}: {value}")]
    InvalidChoice { kind: &'static str, value: String },

    #[error("no story has been generated yet")]
    NoStory,

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}
