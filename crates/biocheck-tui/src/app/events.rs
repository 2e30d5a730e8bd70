//! Event handling for the TUI

use std::sync::Arc;

use biocheck_core::{Action, BiometricPlatform, Completion};
use crossterm::event::KeyEvent;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input
    Key(KeyEvent),
    /// Clock tick (header redraw)
    Tick,
    /// A platform operation finished
    OperationComplete(Completion),
}

/// Channel that background operations report back on
pub struct EventHandler {
    /// Sender for events
    sender: mpsc::UnboundedSender<Event>,
    /// Receiver for events
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Get a clone of the sender for other tasks to send events
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Receive the next event
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Run actions one after another on the runtime, reporting each completion
    pub fn spawn_actions(&self, platform: Arc<dyn BiometricPlatform>, actions: Vec<Action>) {
        let sender = self.sender();
        tokio::spawn(async move {
            for action in actions {
                let completion = action.execute(&*platform).await;
                if sender.send(Event::OperationComplete(completion)).is_err() {
                    tracing::debug!("Event receiver closed; dropping {} result", action);
                    break;
                }
            }
        });
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
