//! Application state and event handling

pub mod config;
pub mod events;
mod state;

pub use config::{BackendKind, TuiConfig};
pub use events::{Event, EventHandler};
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use biocheck_core::{Action, BiometricPlatform};
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;

use crate::ui;

/// Lines moved per PgUp/PgDn
const LOG_PAGE: usize = 10;

/// Main application struct
pub struct App {
    /// Application state
    pub state: AppState,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Tick counter
    pub tick: u64,

    platform: Arc<dyn BiometricPlatform>,
    events: EventHandler,
    tick_rate: Duration,
}

impl App {
    /// Create a new application instance
    pub fn new(platform: Arc<dyn BiometricPlatform>, tick_rate: Duration) -> Self {
        Self {
            state: AppState::new(platform.backend_name()),
            should_quit: false,
            tick: 0,
            platform,
            events: EventHandler::new(),
            tick_rate,
        }
    }

    /// Startup probes, run in order on one task
    pub fn mount(&mut self) {
        let actions = vec![Action::CheckSupport, Action::CheckEnrollment];
        for action in &actions {
            self.state.begin(*action);
        }
        self.events
            .spawn_actions(Arc::clone(&self.platform), actions);
    }

    /// Start an action in the background
    pub fn dispatch(&mut self, action: Action) {
        if !self.state.begin(action) {
            return;
        }
        tracing::debug!("Dispatching {}", action);
        self.events
            .spawn_actions(Arc::clone(&self.platform), vec![action]);
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut keys = EventStream::new();
        let mut ticker = tokio::time::interval(self.tick_rate);

        self.mount();

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, &mut self.state))?;

            let event = tokio::select! {
                maybe_key = keys.next() => match maybe_key {
                    Some(Ok(CrosstermEvent::Key(key))) => Event::Key(key),
                    // Resize and friends only need a redraw
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                Some(event) = self.events.recv() => event,
                _ = ticker.tick() => Event::Tick,
            };

            self.handle_event(event);
        }

        Ok(())
    }

    /// Apply one event to the state
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Key(_) => {}
            Event::Tick => self.tick = self.tick.wrapping_add(1),
            Event::OperationComplete(completion) => self.state.finish(completion),
        }
    }

    /// Handle key press events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // The notice blocks everything until acknowledged
        if self.state.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.state.dismiss_notice();
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.state.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next(),
            KeyCode::Enter => self.dispatch(self.state.selected_action()),
            KeyCode::Char('s') => self.dispatch(Action::CheckSupport),
            KeyCode::Char('e') => self.dispatch(Action::CheckEnrollment),
            KeyCode::Char('a') => self.dispatch(Action::Authenticate),
            KeyCode::Char('c') => self.dispatch(Action::Cancel),
            KeyCode::PageUp => self.state.scroll_log_up(LOG_PAGE),
            KeyCode::PageDown => self.state.scroll_log_down(LOG_PAGE),
            KeyCode::Home => self.state.log_scroll = 0,
            _ => {}
        }
    }

    /// Wait for the next background event
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biocheck_core::platform::simulated::InjectedFailures;
    use biocheck_core::{AuthResult, SimulatedPlatform, SimulatedProfile};
    use rstest::rstest;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(profile: SimulatedProfile) -> (App, Arc<SimulatedPlatform>) {
        let platform = Arc::new(SimulatedPlatform::new(profile.with_latency(Duration::ZERO)));
        let app = App::new(platform.clone(), Duration::from_millis(250));
        (app, platform)
    }

    async fn settle(app: &mut App, completions: usize) {
        for _ in 0..completions {
            let event = app.next_event().await.unwrap();
            app.handle_event(event);
        }
    }

    #[tokio::test]
    async fn test_mount_probes_in_order() {
        let (mut app, _) = app(SimulatedProfile::default());
        app.mount();
        settle(&mut app, 2).await;

        let messages: Vec<_> = app
            .state
            .harness
            .log
            .iter()
            .map(|e| e.message().to_string())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Biometrics enrolled: Yes",
                "Biometric hardware support: Yes (types: Fingerprint)",
            ]
        );
        assert!(app.state.status_message.is_none());
    }

    #[tokio::test]
    async fn test_enter_runs_selected_action() {
        let (mut app, platform) = app(SimulatedProfile::default());
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Enter));
        settle(&mut app, 1).await;

        assert_eq!(platform.calls().authenticate(), 1);
        assert_eq!(app.state.harness.auth_result, Some(AuthResult::Success));
    }

    #[tokio::test]
    async fn test_notice_blocks_until_dismissed() {
        let (mut app, platform) = app(SimulatedProfile::not_enrolled());
        app.handle_key(press(KeyCode::Char('a')));
        settle(&mut app, 1).await;

        assert_eq!(
            app.state.notice.as_ref().unwrap().message,
            "No biometrics enrolled"
        );
        assert_eq!(platform.calls().authenticate(), 0);

        // Blocked: neither quits nor dispatches
        app.handle_key(press(KeyCode::Char('q')));
        app.handle_key(press(KeyCode::Char('s')));
        assert!(!app.should_quit);
        assert_eq!(platform.calls().has_hardware(), 1);

        app.handle_key(press(KeyCode::Enter));
        assert!(app.state.notice.is_none());
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_platform_error_is_not_fatal() {
        let (mut app, _) = app(SimulatedProfile {
            failures: InjectedFailures {
                has_hardware: Some("driver crashed".to_string()),
                ..Default::default()
            },
            ..Default::default()
        });
        app.handle_key(press(KeyCode::Char('s')));
        settle(&mut app, 1).await;

        assert!(!app.should_quit);
        assert!(app.state.notice.is_none());
        assert_eq!(
            app.state.harness.log.latest().unwrap().message(),
            "Error checking biometric support: driver crashed"
        );
    }

    #[rstest]
    #[case::support('s', Action::CheckSupport)]
    #[case::enrollment('e', Action::CheckEnrollment)]
    #[case::authenticate('a', Action::Authenticate)]
    #[case::cancel('c', Action::Cancel)]
    #[tokio::test]
    async fn test_shortcut_dispatches_action(#[case] key: char, #[case] action: Action) {
        let (mut app, _) = app(SimulatedProfile::default());
        app.handle_key(press(KeyCode::Char(key)));

        assert!(app.state.is_in_flight(action));
        for other in Action::ALL.iter().filter(|a| **a != action) {
            assert!(!app.state.is_in_flight(*other));
        }

        settle(&mut app, 1).await;
        assert!(!app.state.is_in_flight(action));
    }

    #[tokio::test]
    async fn test_ctrl_c_quits() {
        let (mut app, _) = app(SimulatedProfile::default());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
