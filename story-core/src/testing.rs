//! Testing utilities.
//!
//! Scripted stand-ins for the completion and speech services so sessions
//! can be exercised without network access. Both mocks are cheap to clone;
//! clones share the script and the request log.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use groq::{Choice, FinishReason, Message, Request, Response};

use crate::error::SynthesisError;
use crate::speech::SpeechBackend;
use crate::story::CompletionBackend;

/// Text returned once the script runs out.
pub const FALLBACK_STORY: &str = "The mock has no more scripted stories.";

/// A scripted reply from [`MockCompletion`].
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A response whose first choice carries this text.
    Text(String),
    /// A successful response with an empty `choices` list.
    NoChoices,
    /// A non-2xx reply from the provider.
    ApiError { status: u16, message: String },
    /// A transport failure.
    NetworkError(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }

    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        MockReply::ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        MockReply::NetworkError(message.into())
    }

    fn into_result(self) -> Result<Response, groq::Error> {
        let choices = match self {
            MockReply::Text(text) => vec![Choice {
                index: 0,
                message: Message::assistant(text),
                finish_reason: Some(FinishReason::Stop),
            }],
            MockReply::NoChoices => Vec::new(),
            MockReply::ApiError { status, message } => {
                return Err(groq::Error::Api { status, message })
            }
            MockReply::NetworkError(message) => return Err(groq::Error::Network(message)),
        };

        Ok(Response {
            id: "mock-completion".to_string(),
            model: "mock".to_string(),
            choices,
            usage: None,
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct CompletionScript {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<Request>>,
}

/// A completion backend that returns scripted replies in order.
#[derive(Clone, Default)]
pub struct MockCompletion {
    inner: Arc<CompletionScript>,
}

impl MockCompletion {
    pub fn new(replies: Vec<MockReply>) -> Self {
        let mock = Self::default();
        lock(&mock.inner.replies).extend(replies);
        mock
    }

    /// Add a reply to the end of the script.
    pub fn queue(&self, reply: MockReply) {
        lock(&self.inner.replies).push_back(reply);
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<Request> {
        lock(&self.inner.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.inner.requests).len()
    }
}

#[async_trait]
impl CompletionBackend for MockCompletion {
    async fn complete(&self, request: Request) -> Result<Response, groq::Error> {
        lock(&self.inner.requests).push(request);
        let reply = lock(&self.inner.replies)
            .pop_front()
            .unwrap_or_else(|| MockReply::text(FALLBACK_STORY));
        reply.into_result()
    }
}

#[derive(Default)]
struct SpeechScript {
    audio: Vec<u8>,
    failure: Option<(u16, String)>,
    texts: Mutex<Vec<String>>,
}

/// A speech backend that returns fixed bytes (or a fixed rejection).
#[derive(Clone, Default)]
pub struct MockSpeech {
    inner: Arc<SpeechScript>,
}

impl MockSpeech {
    pub fn new(audio: Vec<u8>) -> Self {
        Self {
            inner: Arc::new(SpeechScript {
                audio,
                ..Default::default()
            }),
        }
    }

    /// A backend that rejects every request.
    pub fn rejecting(status: u16, message: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SpeechScript {
                failure: Some((status, message.into())),
                ..Default::default()
            }),
        }
    }

    /// Every text received so far.
    pub fn texts(&self) -> Vec<String> {
        lock(&self.inner.texts).clone()
    }
}

#[async_trait]
impl SpeechBackend for MockSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        lock(&self.inner.texts).push(text.to_string());
        match &self.inner.failure {
            Some((status, message)) => Err(SynthesisError::Rejected {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(self.inner.audio.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_completion_replays_script_then_falls_back() {
        let mock = MockCompletion::new(vec![MockReply::text("one")]);
        mock.queue(MockReply::NoChoices);

        let request = Request::new(vec![Message::user("hi")]);
        let first = mock.complete(request.clone()).await.unwrap();
        assert_eq!(first.first_text(), Some("one"));

        let second = mock.complete(request.clone()).await.unwrap();
        assert!(second.choices.is_empty());

        let third = mock.complete(request).await.unwrap();
        assert_eq!(third.first_text(), Some(FALLBACK_STORY));
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_speech_rejecting() {
        let mock = MockSpeech::rejecting(400, "text too long");
        let err = mock.synthesize("hello").await.unwrap_err();
        assert!(matches!(err, SynthesisError::Rejected { status: 400, .. }));
        assert_eq!(mock.texts(), vec!["hello".to_string()]);
    }
}
