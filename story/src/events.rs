//! Event handling for the story TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, InputMode};

/// Lines moved per page scroll.
const PAGE: usize = 10;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
    /// Run story generation before reading more input
    Generate,
    /// Run audio conversion before reading more input
    ConvertAudio,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.show_help() {
        return handle_help_key(app, key);
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Insert => handle_insert_mode(app, key),
    }
}

/// Handle keys in NORMAL mode (form navigation and hotkeys)
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => EventResult::Quit,

        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }

        // Field focus
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
            app.next_field();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
            app.prev_field();
            EventResult::NeedsRedraw
        }

        // Change the focused choice
        KeyCode::Char('h') | KeyCode::Left => {
            app.adjust_focused(-1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.adjust_focused(1);
            EventResult::NeedsRedraw
        }

        // Edit the focused text field
        KeyCode::Char('i') | KeyCode::Enter => {
            if !app.enter_insert_mode() {
                app.set_status("Use h/l to change this field");
            }
            EventResult::NeedsRedraw
        }

        // Actions
        KeyCode::Char('g') => EventResult::Generate,
        KeyCode::Char('a') => EventResult::ConvertAudio,
        KeyCode::Char('s') => {
            app.save_audio();
            EventResult::NeedsRedraw
        }

        // Story scrolling
        KeyCode::Char('J') => {
            app.scroll_down(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('K') => {
            app.scroll_up(1);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll_down(PAGE);
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp => {
            app.scroll_up(PAGE);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle keys in INSERT mode (editing Topic or Interaction)
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            app.enter_normal_mode();
            EventResult::NeedsRedraw
        }

        KeyCode::Left => {
            app.cursor_left();
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Home => {
            app.cursor_home();
            EventResult::NeedsRedraw
        }
        KeyCode::End => {
            app.cursor_end();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Delete => {
            app.delete();
            EventResult::NeedsRedraw
        }

        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle key when the help overlay is open
fn handle_help_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.close_help();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Field;
    use story_core::{MockCompletion, MockSpeech, SpeechSynthesizer, StoryGenerator, StorySession};

    fn app() -> App {
        App::new(StorySession::with_clients(
            Some(StoryGenerator::new(MockCompletion::new(vec![]))),
            SpeechSynthesizer::new(MockSpeech::new(b"ID3".to_vec())),
        ))
    }

    fn press(app: &mut App, code: KeyCode) -> EventResult {
        handle_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_normal_mode_navigation() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('j')), EventResult::NeedsRedraw);
        assert_eq!(app.focused_field, Field::Perspective);

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.form.value(Field::Perspective), "Bird");

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.focused_field, Field::Topic);
    }

    #[test]
    fn test_typing_into_topic() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.input_mode, InputMode::Insert);

        // Hotkeys are plain text while editing
        for c in "gaq".chars() {
            assert_eq!(press(&mut app, KeyCode::Char(c)), EventResult::NeedsRedraw);
        }
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.form.topic, "gaq");
    }

    #[test]
    fn test_action_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('g')), EventResult::Generate);
        assert_eq!(press(&mut app, KeyCode::Char('a')), EventResult::ConvertAudio);
        assert_eq!(press(&mut app, KeyCode::Char('q')), EventResult::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_event(&mut app, Event::Key(ctrl_c)), EventResult::Quit);
    }

    #[test]
    fn test_save_key_without_audio_reports_error() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('s')), EventResult::NeedsRedraw);
        assert!(app.status().unwrap().0.contains("No audio yet"));
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help());

        assert_eq!(press(&mut app, KeyCode::Char('g')), EventResult::Continue);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help());
    }
}
