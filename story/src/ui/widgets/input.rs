//! Text field rendering with a visible cursor

use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

/// Split `content` into spans with the character at `cursor` highlighted.
///
/// `cursor` is a character index; at the end of the text a blank cell is
/// highlighted instead.
pub fn cursor_spans(content: &str, cursor: usize, style: Style) -> Vec<Span<'static>> {
    // Use character-based slicing for unicode safety
    let before_cursor: String = content.chars().take(cursor).collect();
    let at_cursor = content
        .chars()
        .nth(cursor)
        .map(|c| c.to_string())
        .unwrap_or_else(|| " ".to_string());
    let after_cursor: String = content.chars().skip(cursor + 1).collect();

    vec![
        Span::styled(before_cursor, style),
        Span::styled(
            at_cursor,
            style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED),
        ),
        Span::styled(after_cursor, style),
    ]
}
