//! The four harness operations
//!
//! Each operation calls the platform, writes exactly one log line through the
//! injected [`LogSink`] and returns a [`Result`]. Platform failures are caught
//! here; nothing escapes as a panic.

use std::fmt;

use crate::error::{HarnessError, Result};
use crate::log::{LogSink, PendingLog};
use crate::modality;
use crate::platform::{AuthConfig, AuthResponse, BiometricPlatform};
use crate::state::{AuthResult, CapabilityState, EnrollmentState};

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

async fn query_capability<P>(platform: &P) -> Result<CapabilityState>
where
    P: BiometricPlatform + ?Sized,
{
    let hardware = platform.has_hardware().await?;
    let modalities = if hardware {
        platform.supported_modalities().await?
    } else {
        Vec::new()
    };
    Ok(CapabilityState {
        hardware,
        modalities,
    })
}

async fn attempt_prompt<P>(platform: &P) -> Result<AuthResponse>
where
    P: BiometricPlatform + ?Sized,
{
    if !platform.has_hardware().await? {
        return Err(HarnessError::HardwareUnavailable);
    }
    if !platform.is_enrolled().await? {
        return Err(HarnessError::NotEnrolled);
    }
    Ok(platform.authenticate(&AuthConfig::default()).await?)
}

/// Query hardware presence and, when present, the supported modalities
pub async fn probe_hardware<P>(platform: &P, sink: &mut dyn LogSink) -> Result<CapabilityState>
where
    P: BiometricPlatform + ?Sized,
{
    let probed = query_capability(platform).await;

    match probed {
        Ok(capability) => {
            let message = if capability.hardware {
                format!(
                    "Biometric hardware support: Yes (types: {})",
                    modality::describe(&capability.modalities)
                )
            } else {
                "Biometric hardware support: No".to_string()
            };
            sink.append(message);
            Ok(capability)
        }
        Err(e) => {
            tracing::warn!("Hardware probe failed: {}", e);
            sink.append(format!("Error checking biometric support: {}", e));
            Err(e)
        }
    }
}

/// Query whether any biometric credential is enrolled
pub async fn probe_enrollment<P>(platform: &P, sink: &mut dyn LogSink) -> Result<EnrollmentState>
where
    P: BiometricPlatform + ?Sized,
{
    match platform.is_enrolled().await {
        Ok(enrolled) => {
            sink.append(format!("Biometrics enrolled: {}", yes_no(enrolled)));
            Ok(EnrollmentState::from_enrolled(enrolled))
        }
        Err(e) => {
            tracing::warn!("Enrollment probe failed: {}", e);
            sink.append(format!("Error checking enrollment: {}", e));
            Err(e.into())
        }
    }
}

/// Re-check preconditions, then show the platform prompt
///
/// The prompt is never shown when hardware is missing or nothing is enrolled.
/// A prompt that completes with `success=false` is an `Ok(AuthResult::Failure)`.
pub async fn authenticate<P>(platform: &P, sink: &mut dyn LogSink) -> Result<AuthResult>
where
    P: BiometricPlatform + ?Sized,
{
    let attempt = attempt_prompt(platform).await;

    match attempt {
        Ok(response) => {
            let result = AuthResult::from(&response);
            let verdict = if result.is_success() {
                "succeeded"
            } else {
                "failed"
            };
            tracing::info!(success = response.success, error = ?response.error, "Prompt resolved");
            sink.append(format!("Authentication {}: {}", verdict, response.to_json()));
            Ok(result)
        }
        Err(e) if e.is_precondition() => {
            sink.append(e.to_string());
            Err(e)
        }
        Err(e) => {
            tracing::error!("Authentication error: {}", e);
            sink.append(format!("Authentication error: {}", e));
            Err(e)
        }
    }
}

/// Ask the platform to dismiss any in-flight prompt
pub async fn cancel<P>(platform: &P, sink: &mut dyn LogSink) -> Result<()>
where
    P: BiometricPlatform + ?Sized,
{
    match platform.cancel_authenticate().await {
        Ok(()) => {
            sink.append("Authentication cancelled".to_string());
            Ok(())
        }
        Err(e) => {
            tracing::warn!("Cancel failed: {}", e);
            sink.append(format!("Error cancelling authentication: {}", e));
            Err(e.into())
        }
    }
}

/// A user-triggerable harness action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CheckSupport,
    CheckEnrollment,
    Authenticate,
    Cancel,
}

impl Action {
    /// All actions in menu order
    pub const ALL: [Action; 4] = [
        Action::CheckSupport,
        Action::CheckEnrollment,
        Action::Authenticate,
        Action::Cancel,
    ];

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Action::CheckSupport => "Check Biometric Support",
            Action::CheckEnrollment => "Check Enrollment",
            Action::Authenticate => "Authenticate",
            Action::Cancel => "Cancel Authentication",
        }
    }

    /// Run the action, buffering its log output
    pub async fn execute<P>(self, platform: &P) -> Completion
    where
        P: BiometricPlatform + ?Sized,
    {
        let mut log = PendingLog::new();
        let outcome = match self {
            Action::CheckSupport => Outcome::Capability(probe_hardware(platform, &mut log).await),
            Action::CheckEnrollment => {
                Outcome::Enrollment(probe_enrollment(platform, &mut log).await)
            }
            Action::Authenticate => {
                Outcome::Authentication(authenticate(platform, &mut log).await)
            }
            Action::Cancel => Outcome::Cancellation(cancel(platform, &mut log).await),
        };
        Completion { outcome, log }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one operation, tagged by which slot it feeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Capability(Result<CapabilityState>),
    Enrollment(Result<EnrollmentState>),
    Authentication(Result<AuthResult>),
    Cancellation(Result<()>),
}

impl Outcome {
    /// The action that produced this outcome
    pub fn action(&self) -> Action {
        match self {
            Outcome::Capability(_) => Action::CheckSupport,
            Outcome::Enrollment(_) => Action::CheckEnrollment,
            Outcome::Authentication(_) => Action::Authenticate,
            Outcome::Cancellation(_) => Action::Cancel,
        }
    }

    /// Blocking notice for failed authentication attempts
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Outcome::Authentication(Err(e)) => Some(Notice::error(e.to_string())),
            _ => None,
        }
    }
}

/// A finished operation and the log lines it produced
#[derive(Debug, Clone)]
pub struct Completion {
    pub outcome: Outcome,
    pub log: PendingLog,
}

/// A message the user must acknowledge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}
