//! Status bar and hotkey bar widgets

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::{InputMode, StatusKind};
use crate::ui::theme::StoryTheme;

/// Status bar showing the input mode and the latest message
pub struct StatusBarWidget<'a> {
    input_mode: InputMode,
    theme: &'a StoryTheme,
    message: Option<(&'a str, StatusKind)>,
    busy: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(input_mode: InputMode, theme: &'a StoryTheme) -> Self {
        Self {
            input_mode,
            theme,
            message: None,
            busy: None,
        }
    }

    pub fn message(mut self, message: Option<(&'a str, StatusKind)>) -> Self {
        self.message = message;
        self
    }

    pub fn busy(mut self, busy: Option<&'a str>) -> Self {
        self.busy = busy;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Input mode indicator (vim-style)
        let (mode_text, mode_style) = match self.input_mode {
            InputMode::Normal => (
                "NORMAL",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
            InputMode::Insert => (
                "INSERT",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        };

        let mut spans = vec![Span::styled(format!("-- {mode_text} --"), mode_style)];

        // An action in progress hides the previous message
        if let Some(busy) = self.busy {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(busy, self.theme.busy_style()));
        } else if let Some((msg, kind)) = self.message {
            let style = match kind {
                StatusKind::Info => self.theme.info_style(),
                StatusKind::Error => self.theme.error_style(),
            };
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(msg, style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// Hotkey bar widget
pub struct HotkeyBarWidget<'a> {
    input_mode: InputMode,
    theme: &'a StoryTheme,
}

impl<'a> HotkeyBarWidget<'a> {
    pub fn new(input_mode: InputMode, theme: &'a StoryTheme) -> Self {
        Self { input_mode, theme }
    }
}

impl Widget for HotkeyBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hotkeys: &[(&str, &str)] = match self.input_mode {
            InputMode::Normal => &[
                ("j/k", "field"),
                ("h/l", "change"),
                ("i", "edit"),
                ("g", "generate"),
                ("a", "audio"),
                ("s", "save"),
                ("J/K", "scroll"),
                ("?", "help"),
                ("q", "quit"),
            ],
            InputMode::Insert => &[("Esc/Enter", "done"), ("←/→", "move")],
        };

        let key_style = Style::default()
            .fg(self.theme.border_focused)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().add_modifier(Modifier::DIM);

        let mut spans = Vec::new();
        for (key, desc) in hotkeys {
            spans.push(Span::styled(format!(" {key}"), key_style));
            spans.push(Span::styled(format!(" {desc} "), desc_style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
