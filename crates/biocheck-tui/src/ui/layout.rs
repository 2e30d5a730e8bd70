//! Layout helpers

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders};

use super::Theme;

/// Areas of the harness screen, top to bottom
pub struct ScreenLayout {
    pub header: Rect,
    pub info: Rect,
    pub actions: Rect,
    /// Present only once an authentication result exists
    pub result: Option<Rect>,
    pub log: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect, action_count: u16, with_result: bool) -> Self {
        let mut constraints = vec![
            Constraint::Length(2),                // Header
            Constraint::Length(5),                // Info
            Constraint::Length(action_count + 2), // Actions
        ];
        if with_result {
            constraints.push(Constraint::Length(4)); // Result
        }
        constraints.push(Constraint::Min(3)); // Log
        constraints.push(Constraint::Length(2)); // Footer

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let (result, log, footer) = if with_result {
            (Some(chunks[3]), chunks[4], chunks[5])
        } else {
            (None, chunks[3], chunks[4])
        };

        Self {
            header: chunks[0],
            info: chunks[1],
            actions: chunks[2],
            result,
            log,
            footer,
        }
    }
}

/// Create a fixed-size centered box
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Create a section block with title
pub fn section_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .title_style(theme.text_highlight())
        .borders(Borders::ALL)
        .border_style(theme.border())
}

/// Create a focused section block
pub fn section_block_focused<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .title_style(theme.text_highlight())
        .borders(Borders::ALL)
        .border_style(theme.border_focused())
}

/// Calculate the number of visible lines in an area
pub fn visible_lines(area: Rect) -> usize {
    area.height.saturating_sub(2) as usize // Account for borders
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_row_only_when_requested() {
        let area = Rect::new(0, 0, 80, 40);

        let without = ScreenLayout::new(area, 4, false);
        assert!(without.result.is_none());
        assert_eq!(without.actions.height, 6);

        let with = ScreenLayout::new(area, 4, true);
        let result = with.result.unwrap();
        assert_eq!(result.height, 4);
        assert!(with.log.height < without.log.height);
        assert_eq!(with.footer.y + with.footer.height, 40);
    }

    #[test]
    fn test_centered_rect_fixed_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_rect_fixed(40, 5, area);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.y, 2);
    }
}
