//! Footer with key hints and the transient status line

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::Theme;

/// Key hints shown on the harness screen
pub const HINTS: [(&str, &str); 6] = [
    ("↑↓/Enter", "Run"),
    ("s", "Support"),
    ("e", "Enrollment"),
    ("a", "Authenticate"),
    ("c", "Cancel"),
    ("q", "Quit"),
];

/// Render the footer: status line on top, hints below
pub fn render(frame: &mut Frame, area: Rect, status: Option<&str>, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    if let Some(status) = status {
        let line = Paragraph::new(status)
            .style(theme.info())
            .alignment(Alignment::Center);
        frame.render_widget(line, chunks[0]);
    }

    render_help_footer(frame, chunks[1], &HINTS, theme);
}

/// Render help hints in footer
pub fn render_help_footer(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], theme: &Theme) {
    let hint_spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| {
            vec![
                Span::styled(format!("[{}]", key), theme.text_highlight()),
                Span::styled(format!(" {} ", action), theme.text_muted()),
                Span::raw(" "),
            ]
        })
        .collect();

    let line = Line::from(hint_spans);
    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
