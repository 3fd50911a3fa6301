//! Headless mode for the story generator.
//!
//! Generates a single story from command-line flags without a TUI. It's
//! designed for scripting and automated testing: the story (or its JSON
//! record) goes to stdout, progress markers go to stderr.

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use story_core::config::DEFAULT_TEMPERATURE;
use story_core::models::{DEFAULT_MODEL, SUPPORTED_MODELS};
use story_core::{
    Environment, ModelConfig, Perspective, StoryError, StoryParameters, StorySession, TimeOfDay,
    Weather,
};
use tracing::info;

/// Story form values given as flags.
#[derive(Args, Debug, Clone)]
pub struct StoryArgs {
    /// Viewpoint the story is told from (e.g. ant, "grain of sand")
    #[arg(long, default_value_t)]
    pub perspective: Perspective,

    /// Morning, afternoon, evening or night
    #[arg(long, default_value_t)]
    pub time_of_day: TimeOfDay,

    /// Sunny, cloudy, rainy, windy or stormy
    #[arg(long, default_value_t)]
    pub weather: Weather,

    /// Forest, city, desert, beach or mountain
    #[arg(long, default_value_t)]
    pub environment: Environment,

    /// What the story is about
    #[arg(long, default_value_t)]
    pub topic: String,

    /// Something the observer interacts with
    #[arg(long, default_value_t)]
    pub interaction: String,

    /// Model display name (see --list-models)
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature, clamped to 0.0-1.0
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Also synthesize speech and save the MP3 here
    #[arg(long, value_name = "PATH")]
    pub audio: Option<PathBuf>,

    /// Print the story record as JSON
    #[arg(long)]
    pub json: bool,
}

impl StoryArgs {
    pub fn params(&self) -> StoryParameters {
        StoryParameters::new(
            self.perspective,
            self.time_of_day,
            self.weather,
            self.environment,
        )
        .with_topic(self.topic.clone())
        .with_interaction(self.interaction.clone())
    }

    pub fn model_config(&self) -> Result<ModelConfig, StoryError> {
        ModelConfig::new(&self.model, self.temperature)
    }
}

/// Print the model registry, one `display name  id` pair per line.
pub fn list_models(out: &mut impl Write) -> std::io::Result<()> {
    for (name, id) in SUPPORTED_MODELS {
        writeln!(out, "{name:<32} {id}")?;
    }
    Ok(())
}

/// Generate one story and write it to `out`.
pub async fn run_headless(
    args: &StoryArgs,
    mut session: StorySession,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let params = args.params();
    let model = args.model_config()?;

    eprintln!("[GENERATING] {} / {}", params.perspective, model.model_id);
    let story = session.generate(&params, &model).await?.clone();

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&story)?)?;
    } else {
        writeln!(out, "{}", story.text)?;
    }
    out.flush()?;

    if let Some(path) = &args.audio {
        eprintln!("[AUDIO] converting story to speech");
        session.convert_to_audio().await?;
        if let Some(artifact) = session.state_mut().take_latest_audio() {
            let saved = artifact.persist(path)?;
            info!(path = %saved.display(), "audio saved");
            eprintln!("[SAVED] {}", saved.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use story_core::{MockCompletion, MockReply, MockSpeech, SpeechSynthesizer, StoryGenerator};

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        story: StoryArgs,
    }

    fn parse(args: &[&str]) -> StoryArgs {
        TestCli::try_parse_from(std::iter::once("story").chain(args.iter().copied()))
            .unwrap()
            .story
    }

    fn session(reply: MockReply) -> (StorySession, MockCompletion) {
        let mock = MockCompletion::new(vec![reply]);
        let session = StorySession::with_clients(
            Some(StoryGenerator::new(mock.clone())),
            SpeechSynthesizer::new(MockSpeech::new(b"ID3-headless".to_vec())),
        );
        (session, mock)
    }

    #[test]
    fn test_defaults_match_form() {
        let args = parse(&[]);
        assert_eq!(args.perspective, Perspective::Ant);
        assert_eq!(args.model, DEFAULT_MODEL);
        assert_eq!(args.temperature, DEFAULT_TEMPERATURE);
        assert!(args.audio.is_none());
    }

    #[test]
    fn test_flags_parse_loosely() {
        let args = parse(&[
            "--perspective",
            "grain-of-sand",
            "--time-of-day",
            "NIGHT",
            "--topic",
            "tides",
            "--model",
            "Gemma 2 9B",
        ]);
        assert_eq!(args.perspective, Perspective::GrainOfSand);
        assert_eq!(args.time_of_day, TimeOfDay::Night);
        assert_eq!(args.params().topic, "tides");
        assert_eq!(args.model_config().unwrap().model_id, "gemma2-9b-it");
    }

    #[test]
    fn test_unknown_choice_is_rejected() {
        let result = TestCli::try_parse_from(["story", "--weather", "hail"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_models_prints_registry() {
        let mut out = Vec::new();
        list_models(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), SUPPORTED_MODELS.len());
        assert!(text.contains("llama3-70b-8192"));
    }

    #[tokio::test]
    async fn test_headless_prints_story() {
        let (session, mock) = session(MockReply::text("  The wind carries seeds.  "));
        let args = parse(&["--topic", "seeds"]);
        let mut out = Vec::new();

        run_headless(&args, session, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "The wind carries seeds.\n");
        assert!(mock.requests()[0].messages[1].content.contains("seeds"));
    }

    #[tokio::test]
    async fn test_headless_json_and_audio() {
        let dir = tempfile::tempdir().unwrap();
        let audio_path = dir.path().join("story.mp3");
        let (session, _) = session(MockReply::text("Snow hushes the city."));
        let args = parse(&["--json", "--audio", audio_path.to_str().unwrap()]);
        let mut out = Vec::new();

        run_headless(&args, session, &mut out).await.unwrap();

        let record: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(record["text"], "Snow hushes the city.");
        assert_eq!(record["params"]["perspective"], "Ant");
        assert_eq!(std::fs::read(&audio_path).unwrap(), b"ID3-headless");
    }

    #[tokio::test]
    async fn test_headless_unknown_model_fails_before_request() {
        let (session, mock) = session(MockReply::text("unused"));
        let args = parse(&["--model", "GPT-9"]);
        let mut out = Vec::new();

        let err = run_headless(&args, session, &mut out).await.unwrap_err();
        assert!(err.to_string().contains("GPT-9"));
        assert_eq!(mock.call_count(), 0);
    }
}
