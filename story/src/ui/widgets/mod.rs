//! TUI widgets for the story generator

pub mod form;
pub mod input;
pub mod status_bar;
pub mod story;

pub use form::FormWidget;
pub use status_bar::{HotkeyBarWidget, StatusBarWidget};
pub use story::StoryWidget;
