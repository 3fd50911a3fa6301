//! StorySession - the application state handed to every UI action.
//!
//! The session owns the completion and speech clients created at startup
//! and a single-slot register holding the latest story. Actions run one at
//! a time to completion; a failed action leaves the register untouched.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{AppConfig, ModelConfig, API_KEY_VAR};
use crate::error::StoryError;
use crate::models::is_registered_id;
use crate::params::StoryParameters;
use crate::prompt::build_prompt;
use crate::speech::{AudioArtifact, SpeechSynthesizer};
use crate::story::StoryGenerator;

/// A successfully generated story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedStory {
    /// The story text shown to the user.
    pub text: String,
    /// Provider id of the model that wrote it.
    pub model_id: String,
    pub temperature: f32,
    /// The form values it was generated from.
    pub params: StoryParameters,
}

/// Per-session storage.
///
/// `story` is overwritten by each successful generation and never cleared.
/// Audio artifacts accumulate until the session ends (or
/// [`SessionState::clear_audio`]), at which point their files are deleted.
#[derive(Debug, Default)]
pub struct SessionState {
    story: Option<GeneratedStory>,
    audio: Vec<AudioArtifact>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&GeneratedStory> {
        self.story.as_ref()
    }

    /// Replace the stored story.
    pub fn set(&mut self, story: GeneratedStory) -> &GeneratedStory {
        self.story.insert(story)
    }

    /// Take ownership of an audio artifact for the rest of the session.
    pub fn push_audio(&mut self, artifact: AudioArtifact) -> &AudioArtifact {
        let idx = self.audio.len();
        self.audio.push(artifact);
        &self.audio[idx]
    }

    pub fn audio(&self) -> &[AudioArtifact] {
        &self.audio
    }

    pub fn latest_audio(&self) -> Option<&AudioArtifact> {
        self.audio.last()
    }

    /// Remove the newest artifact from the session, handing its file to the caller.
    pub fn take_latest_audio(&mut self) -> Option<AudioArtifact> {
        self.audio.pop()
    }

    /// Delete every audio file created so far.
    pub fn clear_audio(&mut self) {
        self.audio.clear();
    }
}

/// One user's story-generation session.
pub struct StorySession {
    generator: Option<StoryGenerator>,
    synthesizer: SpeechSynthesizer,
    state: SessionState,
}

impl StorySession {
    /// Build a session from startup configuration.
    ///
    /// A missing credential does not fail construction: the session starts
    /// unconfigured and [`StorySession::generate`] reports the problem.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            generator: StoryGenerator::from_config(config).ok(),
            synthesizer: SpeechSynthesizer::from_config(&config.speech),
            state: SessionState::new(),
        }
    }

    /// Build a session around explicitly provided clients.
    pub fn with_clients(generator: Option<StoryGenerator>, synthesizer: SpeechSynthesizer) -> Self {
        Self {
            generator,
            synthesizer,
            state: SessionState::new(),
        }
    }

    /// Whether a completion client is available.
    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// The configuration problem to show at startup, if any.
    pub fn config_error(&self) -> Option<StoryError> {
        if self.is_configured() {
            None
        } else {
            Some(StoryError::MissingCredential(API_KEY_VAR))
        }
    }

    /// Generate a story and store it as the current one.
    ///
    /// On any failure the previously stored story is kept.
    pub async fn generate(
        &mut self,
        params: &StoryParameters,
        model: &ModelConfig,
    ) -> Result<&GeneratedStory, StoryError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(StoryError::MissingCredential(API_KEY_VAR))?;

        // Hand-built configs bypass the registry
        if !is_registered_id(&model.model_id) {
            return Err(StoryError::UnknownModel(model.model_id.clone()));
        }

        let prompt = build_prompt(params);
        let text = generator.generate_story(&prompt, model).await?;

        Ok(self.state.set(GeneratedStory {
            text,
            model_id: model.model_id.clone(),
            temperature: model.temperature,
            params: params.clone(),
        }))
    }

    /// Convert the current story to an MP3 file owned by this session.
    pub async fn convert_to_audio(&mut self) -> Result<&AudioArtifact, StoryError> {
        let text = self
            .state
            .get()
            .map(|story| story.text.clone())
            .ok_or(StoryError::NoStory)?;

        let artifact = self.synthesizer.synthesize_speech(&text).await?;
        info!(
            path = %artifact.path().display(),
            files = self.state.audio().len() + 1,
            "story converted to audio"
        );
        Ok(self.state.push_audio(artifact))
    }

    /// The most recently generated story.
    pub fn story(&self) -> Option<&GeneratedStory> {
        self.state.get()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }
}
