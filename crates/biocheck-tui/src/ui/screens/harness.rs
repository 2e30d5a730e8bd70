//! The harness screen: status, actions, last result and the activity log

use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, Paragraph};

use biocheck_core::{Action, AuthResult, HarnessState};

use crate::app::AppState;
use crate::ui::components::{header, notice, status_bar};
use crate::ui::layout::{section_block, section_block_focused, visible_lines, ScreenLayout};
use crate::ui::Theme;

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Render the harness screen
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let theme = Theme::default();
    let area = frame.area();
    let layout = ScreenLayout::new(
        area,
        Action::ALL.len() as u16,
        state.harness.auth_result.is_some(),
    );

    header::render(frame, layout.header, state.backend, &theme);
    render_info(frame, layout.info, &state.harness, &theme);
    render_actions(frame, layout.actions, state, &theme);
    if let (Some(rect), Some(result)) = (layout.result, state.harness.auth_result.as_ref()) {
        render_result(frame, rect, result, &theme);
    }
    render_log(frame, layout.log, state, &theme);
    status_bar::render(frame, layout.footer, state.status_message.as_deref(), &theme);

    if let Some(n) = &state.notice {
        notice::render(frame, area, n, &theme);
    }
}

fn render_info(frame: &mut Frame, area: Rect, harness: &HarnessState, theme: &Theme) {
    let capability = &harness.capability;
    let types = if capability.modalities.is_empty() {
        "None".to_string()
    } else {
        capability
            .modalities
            .iter()
            .map(|m| format!("{} ({})", m.display_name(), m.code()))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Biometric Hardware Support: ", theme.text_secondary()),
            Span::styled(yes_no(capability.hardware), theme.flag(capability.hardware)),
        ]),
        Line::from(vec![
            Span::styled("Biometrics Enrolled: ", theme.text_secondary()),
            Span::styled(
                yes_no(harness.enrollment.is_enrolled()),
                theme.flag(harness.enrollment.is_enrolled()),
            ),
        ]),
        Line::from(vec![
            Span::styled("Supported Types: ", theme.text_secondary()),
            Span::styled(types, theme.text()),
        ]),
    ];

    let info = Paragraph::new(lines).block(section_block("Device", theme));
    frame.render_widget(info, area);
}

fn render_actions(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let items: Vec<ListItem> = Action::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let marker = if state.is_in_flight(*action) { " …" } else { "" };
            ListItem::new(format!("  {}{}  ", action.label(), marker))
                .style(theme.menu_item(i == state.menu_index))
        })
        .collect();

    let menu = List::new(items).block(section_block_focused("Actions", theme));
    frame.render_widget(menu, area);
}

fn render_result(frame: &mut Frame, area: Rect, result: &AuthResult, theme: &Theme) {
    let mut lines = vec![Line::from(vec![
        Span::styled("Success: ", theme.text_secondary()),
        Span::styled(yes_no(result.is_success()), theme.flag(result.is_success())),
    ])];
    if let Some(reason) = result.reason() {
        lines.push(Line::from(vec![
            Span::styled("Error: ", theme.text_secondary()),
            Span::styled(reason, theme.danger()),
        ]));
    }

    let panel = Paragraph::new(lines)
        .style(theme.result_panel())
        .block(section_block("Authentication Result", theme));
    frame.render_widget(panel, area);
}

fn render_log(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let height = visible_lines(area);
    let lines: Vec<Line> = state
        .harness
        .log
        .iter()
        .skip(state.log_scroll)
        .take(height)
        .map(|entry| Line::from(Span::styled(entry.to_string(), theme.text())))
        .collect();

    let title = if state.log_scroll > 0 {
        format!("Logs (+{} newer)", state.log_scroll)
    } else {
        "Logs".to_string()
    };

    let log = Paragraph::new(lines).block(section_block(&title, theme));
    frame.render_widget(log, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use biocheck_core::{CapabilityState, Completion, LogSink, Modality, Notice, Outcome, PendingLog};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(state: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 32)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn logged(outcome: Outcome, messages: &[&str]) -> Completion {
        let mut log = PendingLog::new();
        for message in messages {
            log.append(message.to_string());
        }
        Completion { outcome, log }
    }

    #[test]
    fn test_initial_screen() {
        let mut state = AppState::new("simulated");
        let text = draw(&mut state);

        assert!(text.contains("Platform backend: simulated"));
        assert!(text.contains("Biometric Hardware Support: No"));
        assert!(text.contains("Biometrics Enrolled: No"));
        assert!(text.contains("Supported Types: None"));
        assert!(text.contains("Check Biometric Support"));
        assert!(text.contains("Cancel Authentication"));
        assert!(!text.contains("Authentication Result"));
    }

    #[test]
    fn test_probed_state_and_log_order() {
        let mut state = AppState::new("simulated");
        state.finish(logged(
            Outcome::Capability(Ok(CapabilityState {
                hardware: true,
                modalities: vec![Modality::Fingerprint, Modality::Face],
            })),
            &["Biometric hardware support: Yes (types: Fingerprint, Face ID)"],
        ));
        state.finish(logged(
            Outcome::Enrollment(Ok(biocheck_core::EnrollmentState::Enrolled)),
            &["Biometrics enrolled: Yes"],
        ));

        let text = draw(&mut state);
        assert!(text.contains("Biometric Hardware Support: Yes"));
        assert!(text.contains("Supported Types: Fingerprint (1), Face ID (2)"));

        let newest = text.find("Biometrics enrolled: Yes").unwrap();
        let older = text.find("Biometric hardware support: Yes").unwrap();
        assert!(newest < older);
    }

    #[test]
    fn test_result_panel_shows_reason() {
        let mut state = AppState::new("simulated");
        state.finish(logged(
            Outcome::Authentication(Ok(AuthResult::Failure {
                reason: Some("user_cancel".to_string()),
            })),
            &[r#"Authentication failed: {"success":false,"error":"user_cancel"}"#],
        ));

        let text = draw(&mut state);
        assert!(text.contains("Authentication Result"));
        assert!(text.contains("Success: No"));
        assert!(text.contains("Error: user_cancel"));
    }

    #[test]
    fn test_notice_dialog_overlays_screen() {
        let mut state = AppState::new("simulated");
        state.notice = Some(Notice::error("No biometrics enrolled"));

        let text = draw(&mut state);
        assert!(text.contains(" Error "));
        assert!(text.contains("No biometrics enrolled"));
        assert!(text.contains("[Enter] OK"));
    }

    #[test]
    fn test_oversized_notice_is_clamped() {
        let mut state = AppState::new("simulated");
        let message = "x".repeat(usize::from(u16::MAX));
        state.notice = Some(Notice::error(message));

        let text = draw(&mut state);
        assert!(text.contains(" Error "));
    }
}
