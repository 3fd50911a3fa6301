//! Color theme and styling for the story TUI

use ratatui::style::{Color, Modifier, Style};

/// UI color theme
#[derive(Debug, Clone)]
pub struct StoryTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Form colors
    pub label: Color,
    pub value: Color,
    pub selected: Color,

    // Text colors
    pub story_text: Color,
    pub hint_text: Color,

    // Status colors
    pub info: Color,
    pub error: Color,
    pub busy: Color,
}

impl Default for StoryTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            label: Color::Gray,
            value: Color::White,
            selected: Color::Cyan,

            story_text: Color::White,
            hint_text: Color::DarkGray,

            info: Color::Green,
            error: Color::LightRed,
            busy: Color::Yellow,
        }
    }
}

impl StoryTheme {
    /// Get style for story text
    pub fn story_style(&self) -> Style {
        Style::default().fg(self.story_text)
    }

    /// Get style for the placeholder shown before the first story
    pub fn hint_style(&self) -> Style {
        Style::default()
            .fg(self.hint_text)
            .add_modifier(Modifier::ITALIC)
    }

    /// Get style for a form label
    pub fn label_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.label)
        }
    }

    /// Get style for a form value
    pub fn value_style(&self, focused: bool) -> Style {
        let style = Style::default().fg(self.value);
        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.info)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn busy_style(&self) -> Style {
        Style::default().fg(self.busy).add_modifier(Modifier::BOLD)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get title style
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .add_modifier(Modifier::BOLD)
    }
}
