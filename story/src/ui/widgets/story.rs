//! Generated story display widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget, Wrap,
    },
};

use crate::ui::theme::StoryTheme;

/// Shown before the first story exists.
pub const PLACEHOLDER: &str = "Enter parameters in the sidebar and press 'g' to generate a dynamic perspective-based story.";

/// Widget for displaying the generated story
pub struct StoryWidget<'a> {
    text: Option<&'a str>,
    scroll: usize,
    theme: &'a StoryTheme,
    footer: Option<String>,
}

impl<'a> StoryWidget<'a> {
    pub fn new(text: Option<&'a str>, theme: &'a StoryTheme) -> Self {
        Self {
            text,
            scroll: 0,
            theme,
            footer: None,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Dim line shown under the story (model and audio info)
    pub fn footer(mut self, footer: Option<String>) -> Self {
        self.footer = footer;
        self
    }
}

impl Widget for StoryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Generated Story [J/K scroll] ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let inner = block.inner(area);
        block.render(area, buf);

        // Nothing fits inside the border on a 1-row or 1-column terminal
        if inner.is_empty() {
            return;
        }

        let Some(text) = self.text else {
            Paragraph::new(Line::from(Span::styled(PLACEHOLDER, self.theme.hint_style())))
                .wrap(Wrap { trim: false })
                .render(inner, buf);
            return;
        };

        let mut lines: Vec<Line> = text
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), self.theme.story_style())))
            .collect();
        if let Some(footer) = self.footer {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(footer, self.theme.hint_style())));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });

        // Scroll limits use wrapped height
        let text_width = inner.width.saturating_sub(1).max(1);
        let visible_height = inner.height as usize;
        let total_lines = paragraph.line_count(text_width);
        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll = self.scroll.min(max_scroll);

        let text_area = Rect {
            width: text_width,
            ..inner
        };
        paragraph
            .scroll((scroll as u16, 0))
            .render(text_area, buf);

        if total_lines > visible_height {
            let scrollbar_area = Rect {
                x: inner.x + inner.width.saturating_sub(1),
                y: inner.y,
                width: 1,
                height: inner.height,
            };

            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .thumb_style(Style::default().fg(Color::DarkGray))
                .track_style(Style::default().fg(Color::Black))
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll);
            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);

            // Hint at bottom if more content below
            if scroll < max_scroll {
                let hint = format!(" ↓{} more ", max_scroll - scroll);
                let hint_y = inner.y + inner.height.saturating_sub(1);
                let hint_style = Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM);
                for (i, ch) in hint.chars().enumerate() {
                    let x = inner.x + (i as u16);
                    if x < inner.x + inner.width.saturating_sub(2) {
                        if let Some(cell) = buf.cell_mut((x, hint_y)) {
                            cell.set_char(ch).set_style(hint_style);
                        }
                    }
                }
            }
        }
    }
}
