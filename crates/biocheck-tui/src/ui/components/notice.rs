//! Blocking notice dialog
//!
//! Drawn over the whole screen until the user acknowledges it.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use biocheck_core::Notice;

use crate::ui::layout::centered_rect_fixed;
use crate::ui::Theme;

/// Render the notice dialog centered in `area`
pub fn render(frame: &mut Frame, area: Rect, notice: &Notice, theme: &Theme) {
    let width = u16::try_from(notice.message.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(6)
        .clamp(30, 60);
    let dialog = centered_rect_fixed(width, 7, area);

    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(format!(" {} ", notice.title))
        .title_style(theme.danger())
        .borders(Borders::ALL)
        .border_style(theme.danger());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(notice.message.as_str(), theme.text())),
        Line::from(""),
        Line::from(Span::styled("[Enter] OK", theme.text_highlight())),
    ];

    let content = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    frame.render_widget(content, dialog);
}
