//! Render orchestration for the story TUI

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::ui::layout::{centered_rect_fixed, AppLayout};
use crate::ui::widgets::{FormWidget, HotkeyBarWidget, StatusBarWidget, StoryWidget};

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::calculate(area);

    render_title_bar(frame, app, layout.title_area);

    let editing = (app.input_mode == InputMode::Insert).then(|| app.cursor_position());
    let form_widget = FormWidget::new(&app.form, &app.theme)
        .focused(app.focused_field)
        .editing(editing);
    frame.render_widget(form_widget, layout.sidebar_area);

    let story = app.session.story();
    let footer = story.map(|s| {
        let audio = app.session.state().audio().len();
        if audio == 0 {
            format!("{} @ {:.2}", s.model_id, s.temperature)
        } else {
            format!("{} @ {:.2} | {audio} audio file(s)", s.model_id, s.temperature)
        }
    });
    let story_widget = StoryWidget::new(story.map(|s| s.text.as_str()), &app.theme)
        .scroll(app.story_scroll)
        .footer(footer);
    frame.render_widget(story_widget, layout.story_area);

    let status_widget = StatusBarWidget::new(app.input_mode, &app.theme)
        .message(app.status())
        .busy(app.busy());
    frame.render_widget(status_widget, layout.status_bar);

    frame.render_widget(
        HotkeyBarWidget::new(app.input_mode, &app.theme),
        layout.hotkey_bar,
    );

    if app.show_help() {
        render_help_overlay(frame, app, area);
    }
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        " Perspective Story Generator | {} | {} ",
        app.form.perspective,
        app.form.model_name()
    );
    let line = Line::from(Span::styled(title, app.theme.title_style()));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(52, 22, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);
    let help_text = vec![
        Line::from(Span::styled(
            " Perspective Story Generator - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Form (NORMAL mode):", heading)),
        Line::from("  j/k, Tab, ↑/↓   Move between fields"),
        Line::from("  h/l or ←/→      Change choice / temperature"),
        Line::from("  i or Enter      Edit Topic or Interaction"),
        Line::from("  Esc or Enter    Finish editing"),
        Line::from(""),
        Line::from(Span::styled("Actions:", heading)),
        Line::from("  g               Generate a story"),
        Line::from("  a               Convert the story to audio"),
        Line::from("  s               Save the latest audio here"),
        Line::from("  J/K, PgUp/PgDn  Scroll the story"),
        Line::from("  ?               Toggle this help"),
        Line::from("  q, Ctrl+c       Quit"),
        Line::from(""),
        Line::from("Unsaved audio is removed on exit."),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use story_core::{
        MockCompletion, MockReply, MockSpeech, SpeechSynthesizer, StoryGenerator, StorySession,
    };

    fn app(configured: bool, replies: Vec<MockReply>) -> App {
        let generator = configured.then(|| StoryGenerator::new(MockCompletion::new(replies)));
        App::new(StorySession::with_clients(
            generator,
            SpeechSynthesizer::new(MockSpeech::new(b"ID3".to_vec())),
        ))
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_initial_screen_shows_form_and_placeholder() {
        let screen = draw(&app(true, vec![]));

        for label in ["Topic", "Perspective", "Time of Day", "Weather", "Environment"] {
            assert!(screen.contains(label), "missing {label}");
        }
        assert!(screen.contains("Interaction"));
        assert!(screen.contains("Temperature"));
        assert!(screen.contains("0.70"));
        assert!(screen.contains("Generated Story"));
        assert!(screen.contains("Enter parameters in the sidebar"));
    }

    #[test]
    fn test_missing_key_error_is_visible() {
        let screen = draw(&app(false, vec![]));
        assert!(screen.contains("GROQ_API_KEY not found"));
    }

    #[tokio::test]
    async fn test_story_replaces_placeholder() {
        let mut app = app(true, vec![MockReply::text("The rock remembers the glacier.")]);
        app.generate().await;

        let screen = draw(&app);
        assert!(screen.contains("The rock remembers the glacier."));
        assert!(!screen.contains("Enter parameters in the sidebar"));
    }

    #[test]
    fn test_busy_label_and_help_overlay() {
        let mut app = app(true, vec![]);
        app.set_busy(Some("Generating story..."));
        app.toggle_help();

        let screen = draw(&app);
        assert!(screen.contains("Generating story..."));
        assert!(screen.contains("Convert the story to audio"));
    }

    #[tokio::test]
    async fn test_tiny_terminals_do_not_panic() {
        let story = "Sand shifts under the moon and the dune forgets its shape. ".repeat(35);
        let mut app = app(true, vec![MockReply::text(story)]);
        app.generate().await;
        app.scroll_down(1000);

        for (width, height) in [(30, 1), (1, 20), (1, 1), (60, 2), (110, 1)] {
            let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
            terminal.draw(|f| render(f, &app)).unwrap();
        }

        app.toggle_help();
        let mut terminal = Terminal::new(TestBackend::new(30, 1)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
    }
}
