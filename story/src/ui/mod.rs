//! UI module for the story TUI

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;
