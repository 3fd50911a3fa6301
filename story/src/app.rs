//! Main application state and logic

use std::path::PathBuf;

use story_core::config::{DEFAULT_TEMPERATURE, MAX_TOKENS};
use story_core::models::{DEFAULT_MODEL, SUPPORTED_MODELS};
use story_core::{
    Environment, ModelConfig, Perspective, StoryError, StoryParameters, StorySession, TimeOfDay,
    Weather,
};
use tracing::{error, info};

use crate::ui::theme::StoryTheme;

/// Temperature change per key press.
pub const TEMPERATURE_STEP: f32 = 0.05;

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - editing a text field
    Insert,
}

/// Fields of the sidebar form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Topic,
    Perspective,
    TimeOfDay,
    Weather,
    Environment,
    Interaction,
    Model,
    Temperature,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Topic,
        Field::Perspective,
        Field::TimeOfDay,
        Field::Weather,
        Field::Environment,
        Field::Interaction,
        Field::Model,
        Field::Temperature,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Topic => "Topic",
            Field::Perspective => "Perspective",
            Field::TimeOfDay => "Time of Day",
            Field::Weather => "Weather",
            Field::Environment => "Environment",
            Field::Interaction => "Interaction",
            Field::Model => "Model",
            Field::Temperature => "Temperature",
        }
    }

    /// Whether the field takes free text rather than a choice.
    pub fn is_text(self) -> bool {
        matches!(self, Field::Topic | Field::Interaction)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Step through `all` from `current`, wrapping at both ends.
fn cycle<T: Copy + PartialEq>(all: &[T], current: T, delta: isize) -> T {
    let len = all.len() as isize;
    let idx = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
    all[(idx + delta).rem_euclid(len) as usize]
}

/// Values entered in the sidebar form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub topic: String,
    pub interaction: String,
    pub perspective: Perspective,
    pub time_of_day: TimeOfDay,
    pub weather: Weather,
    pub environment: Environment,
    /// Index into `SUPPORTED_MODELS`.
    pub model: usize,
    pub temperature: f32,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            topic: String::new(),
            interaction: String::new(),
            perspective: Perspective::default(),
            time_of_day: TimeOfDay::default(),
            weather: Weather::default(),
            environment: Environment::default(),
            model: SUPPORTED_MODELS
                .iter()
                .position(|(name, _)| *name == DEFAULT_MODEL)
                .unwrap_or(0),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl FormState {
    pub fn model_name(&self) -> &'static str {
        SUPPORTED_MODELS[self.model % SUPPORTED_MODELS.len()].0
    }

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
        ModelConfig::new(self.model_name(), self.temperature)
    }

    /// Display value for a field.
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::Topic => self.topic.clone(),
            Field::Perspective => self.perspective.to_string(),
            Field::TimeOfDay => self.time_of_day.to_string(),
            Field::Weather => self.weather.to_string(),
            Field::Environment => self.environment.to_string(),
            Field::Interaction => self.interaction.clone(),
            Field::Model => self.model_name().to_string(),
            Field::Temperature => format!("{:.2}", self.temperature),
        }
    }

    /// Move a choice field by `delta` options, or the temperature by `delta` steps.
    pub fn adjust(&mut self, field: Field, delta: isize) {
        match field {
            Field::Perspective => {
                self.perspective = cycle(&Perspective::ALL, self.perspective, delta)
            }
            Field::TimeOfDay => self.time_of_day = cycle(&TimeOfDay::ALL, self.time_of_day, delta),
            Field::Weather => self.weather = cycle(&Weather::ALL, self.weather, delta),
            Field::Environment => {
                self.environment = cycle(&Environment::ALL, self.environment, delta)
            }
            Field::Model => {
                let len = SUPPORTED_MODELS.len() as isize;
                self.model = (self.model as isize + delta).rem_euclid(len) as usize;
            }
            Field::Temperature => {
                let stepped = self.temperature + delta as f32 * TEMPERATURE_STEP;
                self.temperature = ((stepped * 100.0).round() / 100.0).clamp(0.0, 1.0);
            }
            Field::Topic | Field::Interaction => {}
        }
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Topic => Some(&self.topic),
            Field::Interaction => Some(&self.interaction),
            _ => None,
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Topic => Some(&mut self.topic),
            Field::Interaction => Some(&mut self.interaction),
            _ => None,
        }
    }
}

/// Severity of the status bar message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Main application state
pub struct App {
    pub session: StorySession,
    pub form: FormState,

    // UI state
    pub theme: StoryTheme,
    pub focused_field: Field,
    pub input_mode: InputMode,
    cursor_position: usize,
    show_help: bool,

    // Story display
    pub story_scroll: usize,

    // Status
    status: Option<(String, StatusKind)>,
    busy: Option<&'static str>,

    /// Where 's' copies the latest audio file
    audio_dir: PathBuf,
}

impl App {
    /// Create the application around a session, surfacing any startup
    /// configuration problem in the status bar.
    pub fn new(session: StorySession) -> Self {
        let startup_error = session.config_error();

        let mut app = Self {
            session,
            form: FormState::default(),
            theme: StoryTheme::default(),
            focused_field: Field::default(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            show_help: false,
            story_scroll: 0,
            status: None,
            busy: None,
            audio_dir: PathBuf::from("."),
        };

        match startup_error {
            Some(e) => app.set_error(e.to_string()),
            None => app.set_status("Press 'g' to generate a story, '?' for help"),
        }
        app
    }

    // ------------------------------------------------------------------
    // Form navigation
    // ------------------------------------------------------------------

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    /// Change the focused choice field
    pub fn adjust_focused(&mut self, delta: isize) {
        self.form.adjust(self.focused_field, delta);
    }

    /// Enter insert mode on the focused field; returns false for choice fields.
    pub fn enter_insert_mode(&mut self) -> bool {
        match self.form.text(self.focused_field) {
            Some(text) => {
                self.cursor_position = text.chars().count();
                self.input_mode = InputMode::Insert;
                true
            }
            None => false,
        }
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    // ------------------------------------------------------------------
    // Text editing (character-indexed cursor)
    // ------------------------------------------------------------------

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let cursor = self.cursor_position;
        if let Some(text) = self.form.text_mut(self.focused_field) {
            let byte_pos = text
                .char_indices()
                .nth(cursor)
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            text.insert(byte_pos, c);
            self.cursor_position += 1;
        }
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor = self.cursor_position - 1;
        if let Some(text) = self.form.text_mut(self.focused_field) {
            if let Some((byte_pos, ch)) = text.char_indices().nth(cursor) {
                text.replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
                self.cursor_position = cursor;
            }
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        let cursor = self.cursor_position;
        if let Some(text) = self.form.text_mut(self.focused_field) {
            if let Some((byte_pos, ch)) = text.char_indices().nth(cursor) {
                text.replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.focused_text_len();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.focused_text_len();
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    fn focused_text_len(&self) -> usize {
        self.form
            .text(self.focused_field)
            .map(|t| t.chars().count())
            .unwrap_or(0)
    }

    // ------------------------------------------------------------------
    // Story scrolling
    // ------------------------------------------------------------------

    /// Estimate max scroll based on story length
    /// Uses conservative estimate assuming ~60 char effective width
    fn estimate_max_scroll(&self) -> usize {
        const ESTIMATED_WIDTH: usize = 60;
        const ESTIMATED_VISIBLE_HEIGHT: usize = 10;

        let estimated_lines: usize = self
            .session
            .story()
            .map(|story| {
                story
                    .text
                    .lines()
                    .map(|line| (line.chars().count() / ESTIMATED_WIDTH).max(1))
                    .sum()
            })
            .unwrap_or(0);

        estimated_lines.saturating_sub(ESTIMATED_VISIBLE_HEIGHT)
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.story_scroll = self
            .story_scroll
            .min(self.estimate_max_scroll())
            .saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.story_scroll = self
            .story_scroll
            .saturating_add(lines)
            .min(self.estimate_max_scroll());
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Generate a story from the current form values.
    pub async fn generate(&mut self) {
        let params = self.form.params();
        let model = match self.form.model_config() {
            Ok(model) => model,
            Err(e) => {
                self.set_error(e.to_string());
                return;
            }
        };

        info!(
            perspective = %params.perspective,
            model = %model.model_id,
            max_tokens = MAX_TOKENS,
            "generate requested"
        );

        match self.session.generate(&params, &model).await {
            Ok(story) => {
                let message = format!("Story generated with {}", story.model_id);
                self.story_scroll = 0;
                self.set_status(message);
            }
            Err(e) => {
                error!(error = %e, "generation failed");
                self.set_error(format!("Error: {e}"));
            }
        }
    }

    /// Convert the current story to audio.
    pub async fn convert_to_audio(&mut self) {
        if self.session.story().is_none() {
            self.set_error("Generate a story before converting it to audio");
            return;
        }

        match self.session.convert_to_audio().await {
            Ok(artifact) => {
                let message = format!(
                    "Audio ready at {} (press 's' to keep a copy)",
                    artifact.path().display()
                );
                self.set_status(message);
            }
            Err(e) => {
                error!(error = %e, "audio conversion failed");
                self.set_error(format!("Error: {e}"));
            }
        }
    }

    /// Copy the newest audio file out of the temp directory so it
    /// survives exit.
    pub fn save_audio(&mut self) {
        let Some(artifact) = self.session.state().latest_audio() else {
            self.set_error("No audio yet: press 'a' to convert the story first");
            return;
        };
        let Some(name) = artifact.path().file_name() else {
            self.set_error("Audio file has no name");
            return;
        };

        match artifact.copy_to(self.audio_dir.join(name)) {
            Ok(saved) => {
                info!(path = %saved.display(), "audio saved");
                self.set_status(format!("Audio saved to {}", saved.display()));
            }
            Err(e) => {
                error!(error = %e, "saving audio failed");
                self.set_error(format!("Error: {e}"));
            }
        }
    }

    // ------------------------------------------------------------------
    // Status and overlays
    // ------------------------------------------------------------------

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), StatusKind::Info));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), StatusKind::Error));
    }

    pub fn status(&self) -> Option<(&str, StatusKind)> {
        self.status.as_ref().map(|(msg, kind)| (msg.as_str(), *kind))
    }

    /// Mark an action as in progress (shown instead of the status message).
    pub fn set_busy(&mut self, label: Option<&'static str>) {
        self.busy = label;
    }

    pub fn busy(&self) -> Option<&'static str> {
        self.busy
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }
}
