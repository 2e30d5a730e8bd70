//! Application state

use std::collections::HashMap;

use biocheck_core::{Action, Completion, HarnessState, Notice};

/// Application state
pub struct AppState {
    /// Capability, enrollment, result and log slots
    pub harness: HarnessState,

    /// Name of the platform backend in use
    pub backend: &'static str,

    /// Selected action in the menu
    pub menu_index: usize,

    /// Blocking notice awaiting acknowledgement
    pub notice: Option<Notice>,

    /// Log lines scrolled past from the newest entry
    pub log_scroll: usize,

    /// Transient status line
    pub status_message: Option<String>,

    /// Operations currently running, by action
    in_flight: HashMap<Action, usize>,
}

impl AppState {
    /// Create new application state
    pub fn new(backend: &'static str) -> Self {
        Self {
            harness: HarnessState::new(),
            backend,
            menu_index: 0,
            notice: None,
            log_scroll: 0,
            status_message: None,
            in_flight: HashMap::new(),
        }
    }

    /// Action under the menu cursor
    pub fn selected_action(&self) -> Action {
        Action::ALL[self.menu_index.min(Action::ALL.len() - 1)]
    }

    pub fn select_previous(&mut self) {
        self.menu_index = self.menu_index.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.menu_index < Action::ALL.len() - 1 {
            self.menu_index += 1;
        }
    }

    pub fn is_in_flight(&self, action: Action) -> bool {
        self.in_flight.get(&action).copied().unwrap_or(0) > 0
    }

    /// Record that an action is starting
    ///
    /// Returns false when a second prompt is requested while one is still up.
    pub fn begin(&mut self, action: Action) -> bool {
        if action == Action::Authenticate && self.is_in_flight(Action::Authenticate) {
            self.status_message = Some("Authentication already in progress".to_string());
            return false;
        }
        *self.in_flight.entry(action).or_insert(0) += 1;
        self.status_message = Some(format!("{}...", action.label()));
        true
    }

    /// Fold a finished operation into the state
    pub fn finish(&mut self, completion: Completion) {
        let action = completion.outcome.action();
        if let Some(count) = self.in_flight.get_mut(&action) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.in_flight.remove(&action);
            }
        }

        if let Some(notice) = self.harness.apply(completion) {
            self.notice = Some(notice);
        }

        // Newest entries are always at the top; jump back to them
        self.log_scroll = 0;
        self.status_message = if self.in_flight.is_empty() {
            None
        } else {
            Some("Waiting for platform...".to_string())
        };
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn scroll_log_up(&mut self, lines: usize) {
        self.log_scroll = self.log_scroll.saturating_sub(lines);
    }

    pub fn scroll_log_down(&mut self, lines: usize) {
        let max = self.harness.log.len().saturating_sub(1);
        self.log_scroll = (self.log_scroll + lines).min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biocheck_core::{HarnessError, Outcome, PendingLog};

    fn completion(outcome: Outcome) -> Completion {
        Completion {
            outcome,
            log: PendingLog::new(),
        }
    }

    #[test]
    fn test_menu_bounds() {
        let mut state = AppState::new("simulated");
        state.select_previous();
        assert_eq!(state.selected_action(), Action::CheckSupport);

        for _ in 0..10 {
            state.select_next();
        }
        assert_eq!(state.selected_action(), Action::Cancel);
    }

    #[test]
    fn test_single_prompt_in_flight() {
        let mut state = AppState::new("simulated");
        assert!(state.begin(Action::Authenticate));
        assert!(!state.begin(Action::Authenticate));
        assert_eq!(
            state.status_message.as_deref(),
            Some("Authentication already in progress")
        );

        // Cancel is always allowed alongside
        assert!(state.begin(Action::Cancel));
        state.finish(completion(Outcome::Cancellation(Ok(()))));
        assert!(state.is_in_flight(Action::Authenticate));

        state.finish(completion(Outcome::Authentication(Err(
            HarnessError::NotEnrolled,
        ))));
        assert!(!state.is_in_flight(Action::Authenticate));
        assert!(state.status_message.is_none());
        assert_eq!(state.notice.as_ref().unwrap().message, "No biometrics enrolled");

        state.dismiss_notice();
        assert!(state.notice.is_none());
    }
}
