//! Harness state slots

use serde::Serialize;

use crate::log::ActivityLog;
use crate::modality::Modality;
use crate::operations::{Completion, Notice, Outcome};
use crate::platform::AuthResponse;

/// What the last hardware probe found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityState {
    pub hardware: bool,
    pub modalities: Vec<Modality>,
}

/// Binary enrollment level; partial per-modality enrollment is not modelled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum EnrollmentState {
    #[default]
    None,
    Enrolled,
}

impl EnrollmentState {
    pub fn from_enrolled(enrolled: bool) -> Self {
        if enrolled {
            EnrollmentState::Enrolled
        } else {
            EnrollmentState::None
        }
    }

    /// 0 for none, 1 for enrolled
    pub fn level(&self) -> u8 {
        match self {
            EnrollmentState::None => 0,
            EnrollmentState::Enrolled => 1,
        }
    }

    pub fn is_enrolled(&self) -> bool {
        *self == EnrollmentState::Enrolled
    }
}

/// Outcome of the last prompt that was actually shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AuthResult {
    Success,
    Failure { reason: Option<String> },
}

impl AuthResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthResult::Success)
    }

    /// Platform reason for a failure
    pub fn reason(&self) -> Option<&str> {
        match self {
            AuthResult::Success => None,
            AuthResult::Failure { reason } => reason.as_deref(),
        }
    }
}

impl From<&AuthResponse> for AuthResult {
    fn from(response: &AuthResponse) -> Self {
        if response.success {
            AuthResult::Success
        } else {
            AuthResult::Failure {
                reason: response.error.clone(),
            }
        }
    }
}

/// Everything the screen displays
#[derive(Debug, Default)]
pub struct HarnessState {
    pub capability: CapabilityState,
    pub enrollment: EnrollmentState,
    /// `None` until a prompt has been shown
    pub auth_result: Option<AuthResult>,
    pub log: ActivityLog,
}

impl HarnessState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished operation into the state
    ///
    /// Buffered log entries are prepended first. Slots only change on success;
    /// a failed operation leaves the previous value in place. Returns the
    /// blocking notice the user should see, if any.
    pub fn apply(&mut self, completion: Completion) -> Option<Notice> {
        let Completion { outcome, log } = completion;
        self.log.absorb(log);

        let notice = outcome.notice();
        match outcome {
            Outcome::Capability(Ok(capability)) => self.capability = capability,
            Outcome::Enrollment(Ok(enrollment)) => self.enrollment = enrollment,
            Outcome::Authentication(Ok(result)) => self.auth_result = Some(result),
            Outcome::Capability(Err(_))
            | Outcome::Enrollment(Err(_))
            | Outcome::Authentication(Err(_))
            | Outcome::Cancellation(_) => {}
        }
        notice
    }
}
