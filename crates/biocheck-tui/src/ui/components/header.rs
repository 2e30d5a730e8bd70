//! Header component

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::Theme;

/// Render the two-line header: title and clock, then the backend subtitle
pub fn render(frame: &mut Frame, area: Rect, backend: &str, theme: &Theme) {
    let now = chrono::Local::now();
    let time_str = now.format("%H:%M:%S").to_string();
    let title = " BIOMETRIC AUTHENTICATION TEST ";

    let header_text = vec![
        Line::from(vec![
            Span::styled(title, theme.title()),
            Span::raw(" ".repeat(
                area.width
                    .saturating_sub(title.len() as u16 + time_str.len() as u16 + 2)
                    as usize,
            )),
            Span::styled(format!(" {} ", time_str), theme.text_highlight()),
        ]),
        Line::from(Span::styled(
            format!(" Platform backend: {}", backend),
            theme.text_secondary(),
        )),
    ];

    frame.render_widget(Paragraph::new(header_text), area);
}
