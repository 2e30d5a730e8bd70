//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
pub mod theme;

pub use theme::Theme;

use ratatui::prelude::*;

use crate::app::AppState;

/// Main render function
pub fn render(frame: &mut Frame, state: &mut AppState) {
    screens::harness::render(frame, state);
}
