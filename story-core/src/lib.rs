//! Observational story generation.
//!
//! This crate provides:
//! - The registry of supported Groq models and the story parameter enums
//! - Prompt construction from the form values
//! - A completion client that turns a prompt into story text
//! - A speech client that turns story text into a temporary MP3 file
//! - `StorySession`, the per-user state shared by the TUI and headless mode
//!
//! # Quick Start
//!
//! ```ignore
//! use story_core::{AppConfig, ModelConfig, StoryParameters, StorySession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = StorySession::new(&AppConfig::from_env());
//!
//!     let params = StoryParameters::default().with_topic("a sunrise");
//!     let model = ModelConfig::new("Llama 3 70B", 0.7)?;
//!
//!     let story = session.generate(&params, &model).await?;
//!     println!("{}", story.text);
//!
//!     let audio = session.convert_to_audio().await?;
//!     println!("audio at {}", audio.path().display());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod params;
pub mod prompt;
pub mod session;
pub mod speech;
pub mod story;
pub mod testing;

// Primary public API
pub use config::{AppConfig, ModelConfig, SpeechConfig};
pub use error::{CompletionError, StoryError, SynthesisError};
pub use models::{resolve_model_id, SUPPORTED_MODELS};
pub use params::{Environment, Perspective, StoryParameters, TimeOfDay, Weather};
pub use prompt::build_prompt;
pub use session::{GeneratedStory, SessionState, StorySession};
pub use speech::{AudioArtifact, GoogleTts, SpeechBackend, SpeechSynthesizer};
pub use story::{CompletionBackend, StoryGenerator};
pub use testing::{MockCompletion, MockReply, MockSpeech};
