//! Text-to-speech conversion.
//!
//! The default backend talks to the Google Translate speech endpoint, which
//! only accepts short snippets: text is cut into chunks of at most
//! [`MAX_CHUNK_CHARS`] characters and the returned MP3 segments are
//! concatenated in order.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use tempfile::TempPath;
use tracing::{debug, info, warn};

use crate::config::SpeechConfig;
use crate::error::SynthesisError;

/// MIME type of every artifact produced here.
pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// Longest snippet the speech endpoint accepts.
pub const MAX_CHUNK_CHARS: usize = 100;

const SENTENCE_BREAKS: &[char] = &['.', '!', '?', ';', ':', '\n'];

/// Anything that can turn text into MP3 bytes.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError>;
}

/// Google Translate text-to-speech backend.
pub struct GoogleTts {
    client: reqwest::Client,
    endpoint: String,
    lang: String,
}

impl GoogleTts {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint().trim_end_matches('/').to_string(),
            lang: config.lang.clone(),
        }
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, SynthesisError> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(format!("{}/translate_tts", self.endpoint))
            .header(USER_AGENT, "Mozilla/5.0")
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.lang.as_str()),
                ("q", chunk),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(status, "speech request rejected");
            return Err(SynthesisError::Rejected { status, message });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechBackend for GoogleTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        debug!(chunks = chunks.len(), lang = %self.lang, "synthesizing speech");

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, idx, chunks.len()).await?);
        }
        Ok(audio)
    }
}

/// Split `text` into speakable chunks of at most `max_chars` characters.
///
/// Sentence punctuation is preferred as a boundary, then whitespace; a single
/// word longer than `max_chars` is cut mid-word. Chunks without any
/// alphanumeric character are dropped.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);

    let mut pieces = Vec::new();
    for sentence in text.split_inclusive(SENTENCE_BREAKS) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        if sentence.chars().count() <= max_chars {
            pieces.push(sentence.to_string());
        } else {
            pieces.extend(split_long(sentence, max_chars));
        }
    }

    // Pack neighbouring pieces back together to keep the request count down
    let mut chunks: Vec<String> = Vec::new();
    for piece in pieces {
        match chunks.last_mut() {
            Some(last) if last.chars().count() + 1 + piece.chars().count() <= max_chars => {
                last.push(' ');
                last.push_str(&piece);
            }
            _ => chunks.push(piece),
        }
    }

    chunks.retain(|c| c.chars().any(char::is_alphanumeric));
    chunks
}

/// Greedy word packing for a sentence that does not fit in one chunk.
fn split_long(sentence: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in sentence.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for part in chars.chunks(max_chars) {
                out.push(part.iter().collect());
            }
            continue;
        }

        let current_len = current.chars().count();
        if current.is_empty() {
            current.push_str(word);
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// An MP3 file produced from a story.
///
/// The file is temporary and is removed when the artifact is dropped; use
/// [`AudioArtifact::persist`] to keep a copy.
#[derive(Debug)]
pub struct AudioArtifact {
    path: TempPath,
    mime_type: &'static str,
}

impl AudioArtifact {
    fn write(bytes: &[u8], dir: Option<&Path>) -> Result<Self, SynthesisError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("story-").suffix(".mp3");

        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(bytes)?;
        file.flush()?;

        let path = file.into_temp_path();
        info!(path = %path.display(), bytes = bytes.len(), "audio file written");

        Ok(Self {
            path,
            mime_type: AUDIO_MIME_TYPE,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> &str {
        self.mime_type
    }

    /// Copy the audio to `dest`, keeping the temporary file.
    pub fn copy_to(&self, dest: impl AsRef<Path>) -> Result<PathBuf, SynthesisError> {
        let dest = dest.as_ref().to_path_buf();
        std::fs::copy(&self.path, &dest)?;
        Ok(dest)
    }

    /// Copy the audio to `dest` and release the temporary file.
    pub fn persist(self, dest: impl AsRef<Path>) -> Result<PathBuf, SynthesisError> {
        self.copy_to(dest)
    }
}

impl Drop for AudioArtifact {
    fn drop(&mut self) {
        debug!(path = %self.path.display(), "removing temporary audio file");
    }
}

/// Converts story text to an audio file through a speech backend.
#[derive(Clone)]
pub struct SpeechSynthesizer {
    backend: Arc<dyn SpeechBackend>,
    temp_dir: Option<PathBuf>,
}

impl SpeechSynthesizer {
    pub fn new(backend: impl SpeechBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
            temp_dir: None,
        }
    }

    /// Build a synthesizer backed by [`GoogleTts`].
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(GoogleTts::new(config))
    }

    /// Write artifacts into `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Synthesize `text` into a new temporary MP3 file.
    ///
    /// Empty or whitespace-only text is rejected before any request is made.
    pub async fn synthesize_speech(&self, text: &str) -> Result<AudioArtifact, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let audio = self
            .backend
            .synthesize(text)
            .await
            .inspect_err(|e| warn!(error = %e, "speech synthesis failed"))?;

        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }

        AudioArtifact::write(&audio, self.temp_dir.as_deref())
    }
}
