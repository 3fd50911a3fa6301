//! End-to-end session flows against scripted backends.
//!
//! No network access; every completion and speech call is answered by the
//! mocks in `story_core::testing`.

use story_core::{
    build_prompt, resolve_model_id, AppConfig, Environment, GeneratedStory, MockCompletion,
    MockReply, MockSpeech, ModelConfig, Perspective, SpeechSynthesizer, StoryError,
    StoryGenerator, StoryParameters, StorySession, TimeOfDay, Weather,
};

const MP3_BYTES: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00fake-frames";

fn ant_in_the_forest() -> StoryParameters {
    StoryParameters::new(
        Perspective::Ant,
        TimeOfDay::Morning,
        Weather::Sunny,
        Environment::Forest,
    )
    .with_topic("adventure")
    .with_interaction("a leaf")
}

fn session_with(mock: &MockCompletion, speech: &MockSpeech) -> StorySession {
    StorySession::with_clients(
        Some(StoryGenerator::new(mock.clone())),
        SpeechSynthesizer::new(speech.clone()),
    )
}

#[test]
fn test_prompt_mentions_every_form_value() {
    let prompt = build_prompt(&ant_in_the_forest());

    for expected in ["Ant", "Morning", "Sunny", "Forest", "adventure", "a leaf"] {
        assert!(prompt.contains(expected), "missing {expected:?} in {prompt}");
    }
}

#[tokio::test]
async fn test_empty_choices_leave_session_unchanged() {
    let mock = MockCompletion::new(vec![MockReply::text("The ant waves."), MockReply::NoChoices]);
    let mut session = session_with(&mock, &MockSpeech::new(MP3_BYTES.to_vec()));
    let params = ant_in_the_forest();
    let model = ModelConfig::default();

    session.generate(&params, &model).await.unwrap();
    let before: GeneratedStory = session.story().cloned().unwrap();

    let err = session.generate(&params, &model).await.unwrap_err();
    assert!(matches!(err, StoryError::Completion(_)));
    assert_eq!(session.story(), Some(&before));
    assert_eq!(mock.call_count(), 2);
}

#[test]
fn test_llama_3_70b_resolves() {
    assert_eq!(resolve_model_id("Llama 3 70B").unwrap(), "llama3-70b-8192");
}

#[tokio::test]
async fn test_missing_credential_is_reported_without_calling_api() {
    let config = AppConfig::from_lookup(|_| None);
    let mut session = StorySession::new(&config);

    let startup = session.config_error().expect("startup error should be shown");
    assert!(startup.to_string().contains("GROQ_API_KEY"));

    let err = session
        .generate(&ant_in_the_forest(), &ModelConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoryError::MissingCredential("GROQ_API_KEY")));
    assert!(session.story().is_none());
}

#[tokio::test]
async fn test_audio_from_generated_story_is_readable_mp3() {
    let mock = MockCompletion::new(vec![MockReply::text(
        "Morning light filters through the ferns as the ant lifts the leaf.",
    )]);
    let speech = MockSpeech::new(MP3_BYTES.to_vec());
    let mut session = session_with(&mock, &speech);

    session
        .generate(&ant_in_the_forest(), &ModelConfig::new("Llama 3 70B", 0.7).unwrap())
        .await
        .unwrap();
    let artifact = session.convert_to_audio().await.unwrap();

    assert_eq!(artifact.mime_type(), "audio/mpeg");
    assert_eq!(std::fs::read(artifact.path()).unwrap(), MP3_BYTES);
    assert_eq!(
        speech.texts(),
        vec!["Morning light filters through the ferns as the ant lifts the leaf.".to_string()]
    );
}

#[tokio::test]
async fn test_audio_is_removed_when_session_ends() {
    let mock = MockCompletion::new(vec![MockReply::text("A gull circles the pier.")]);
    let mut session = session_with(&mock, &MockSpeech::new(MP3_BYTES.to_vec()));

    session
        .generate(&StoryParameters::default(), &ModelConfig::default())
        .await
        .unwrap();
    let path = session.convert_to_audio().await.unwrap().path().to_path_buf();
    assert!(path.exists());

    drop(session);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_speech_failure_keeps_story() {
    let mock = MockCompletion::new(vec![MockReply::text("Rain drums on the tin roof.")]);
    let mut session = session_with(&mock, &MockSpeech::rejecting(503, "unavailable"));

    session
        .generate(&StoryParameters::default(), &ModelConfig::default())
        .await
        .unwrap();
    let err = session.convert_to_audio().await.unwrap_err();

    assert!(matches!(err, StoryError::Synthesis(_)));
    assert_eq!(session.story().unwrap().text, "Rain drums on the tin roof.");
    assert!(session.state().audio().is_empty());
}

#[tokio::test]
async fn test_request_carries_form_model_and_temperature() {
    let mock = MockCompletion::new(vec![MockReply::text("ok")]);
    let mut session = session_with(&mock, &MockSpeech::new(MP3_BYTES.to_vec()));
    let model = ModelConfig::new("Gemma 2 9B", 1.7).unwrap();

    session.generate(&ant_in_the_forest(), &model).await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model.as_deref(), Some("gemma2-9b-it"));
    assert_eq!(requests[0].temperature, Some(1.0));
    assert_eq!(requests[0].max_tokens, 1000);
    assert_eq!(requests[0].messages[1].content, build_prompt(&ant_in_the_forest()));
}
