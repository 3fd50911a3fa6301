//! Sidebar form widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::{Field, FormState};
use crate::ui::theme::StoryTheme;
use crate::ui::widgets::input::cursor_spans;

const GAUGE_WIDTH: usize = 20;

/// Widget rendering the story parameter form
pub struct FormWidget<'a> {
    form: &'a FormState,
    theme: &'a StoryTheme,
    focused_field: Field,
    /// Cursor position when the focused text field is being edited
    editing: Option<usize>,
}

impl<'a> FormWidget<'a> {
    pub fn new(form: &'a FormState, theme: &'a StoryTheme) -> Self {
        Self {
            form,
            theme,
            focused_field: Field::default(),
            editing: None,
        }
    }

    pub fn focused(mut self, field: Field) -> Self {
        self.focused_field = field;
        self
    }

    pub fn editing(mut self, cursor: Option<usize>) -> Self {
        self.editing = cursor;
        self
    }

    fn value_line(&self, field: Field) -> Line<'static> {
        let focused = field == self.focused_field;
        let style = self.theme.value_style(focused);
        let value = self.form.value(field);

        if field.is_text() {
            return match self.editing {
                Some(cursor) if focused => {
                    let mut spans = vec![Span::raw("  ")];
                    spans.extend(cursor_spans(&value, cursor, style));
                    Line::from(spans)
                }
                _ if value.is_empty() => Line::from(Span::styled(
                    "  (empty)",
                    Style::default().add_modifier(Modifier::DIM),
                )),
                _ => Line::from(Span::styled(format!("  {value}"), style)),
            };
        }

        if field == Field::Temperature {
            let filled = (self.form.temperature * GAUGE_WIDTH as f32).round() as usize;
            let gauge = format!(
                "{}{}",
                "█".repeat(filled.min(GAUGE_WIDTH)),
                "░".repeat(GAUGE_WIDTH.saturating_sub(filled))
            );
            return Line::from(vec![
                Span::styled(format!("  {gauge} "), self.theme.border_style(focused)),
                Span::styled(value, style),
            ]);
        }

        let (left, right) = if focused { ("‹ ", " ›") } else { ("  ", "") };
        Line::from(vec![
            Span::styled(left, self.theme.border_style(focused)),
            Span::styled(value, style),
            Span::styled(right, self.theme.border_style(focused)),
        ])
    }
}

impl Widget for FormWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Story Parameters ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.editing.is_none()));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for field in Field::ALL {
            let focused = field == self.focused_field;
            let marker = if focused { "▸ " } else { "  " };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}", field.label()),
                self.theme.label_style(focused),
            )));
            lines.push(self.value_line(field));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
