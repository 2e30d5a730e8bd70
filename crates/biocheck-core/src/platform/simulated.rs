//! Scripted platform backend
//!
//! Behaves like a device described by a [`SimulatedProfile`]. Used as the
//! default backend on hosts without biometric hardware and as the test double
//! for the operations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use super::{AuthConfig, AuthResponse, BiometricPlatform, PlatformResult, APP_CANCEL};
use crate::error::PlatformError;
use crate::modality::Modality;

/// What the simulated prompt resolves to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptedOutcome {
    #[default]
    Success,
    /// Prompt completes with `success=false` and this error code
    Failure { reason: String },
}

impl ScriptedOutcome {
    fn response(&self) -> AuthResponse {
        match self {
            ScriptedOutcome::Success => AuthResponse::success(),
            ScriptedOutcome::Failure { reason } => AuthResponse::failure(reason.clone()),
        }
    }
}

/// Per-call failure injection; a `Some` message makes that call fail
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectedFailures {
    pub has_hardware: Option<String>,
    pub supported_modalities: Option<String>,
    pub is_enrolled: Option<String>,
    pub authenticate: Option<String>,
    pub cancel_authenticate: Option<String>,
}

/// Device description for the simulated backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedProfile {
    pub hardware: bool,
    pub modalities: Vec<Modality>,
    pub enrolled: bool,
    pub outcome: ScriptedOutcome,
    /// How long the prompt stays up before resolving
    pub prompt_latency_ms: u64,
    pub failures: InjectedFailures,
}

impl Default for SimulatedProfile {
    fn default() -> Self {
        Self {
            hardware: true,
            modalities: vec![Modality::Fingerprint],
            enrolled: true,
            outcome: ScriptedOutcome::Success,
            prompt_latency_ms: 1500,
            failures: InjectedFailures::default(),
        }
    }
}

impl SimulatedProfile {
    /// A device with no biometric hardware at all
    pub fn no_hardware() -> Self {
        Self {
            hardware: false,
            modalities: Vec::new(),
            enrolled: false,
            ..Self::default()
        }
    }

    /// Hardware present but nothing enrolled
    pub fn not_enrolled() -> Self {
        Self {
            enrolled: false,
            ..Self::default()
        }
    }

    /// Set the prompt latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.prompt_latency_ms = latency.as_millis() as u64;
        self
    }
}

/// Number of times each platform call was made
#[derive(Debug, Default)]
pub struct CallCounts {
    has_hardware: AtomicUsize,
    supported_modalities: AtomicUsize,
    is_enrolled: AtomicUsize,
    authenticate: AtomicUsize,
    cancel_authenticate: AtomicUsize,
}

impl CallCounts {
    pub fn has_hardware(&self) -> usize {
        self.has_hardware.load(Ordering::SeqCst)
    }

    pub fn supported_modalities(&self) -> usize {
        self.supported_modalities.load(Ordering::SeqCst)
    }

    pub fn is_enrolled(&self) -> usize {
        self.is_enrolled.load(Ordering::SeqCst)
    }

    /// Times the prompt was actually shown
    pub fn authenticate(&self) -> usize {
        self.authenticate.load(Ordering::SeqCst)
    }

    pub fn cancel_authenticate(&self) -> usize {
        self.cancel_authenticate.load(Ordering::SeqCst)
    }
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

fn injected(failure: &Option<String>) -> PlatformResult<()> {
    match failure {
        Some(message) => Err(PlatformError::new(message.clone())),
        None => Ok(()),
    }
}

/// Backend driven by a [`SimulatedProfile`]
#[derive(Debug, Default)]
pub struct SimulatedPlatform {
    profile: Mutex<SimulatedProfile>,
    calls: CallCounts,
    last_prompt: Mutex<Option<AuthConfig>>,
    cancel: Notify,
}

impl SimulatedPlatform {
    pub fn new(profile: SimulatedProfile) -> Self {
        Self {
            profile: Mutex::new(profile),
            calls: CallCounts::default(),
            last_prompt: Mutex::new(None),
            cancel: Notify::new(),
        }
    }

    /// Call counters for assertions
    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    /// Configuration the most recent prompt was shown with
    pub fn last_prompt(&self) -> Option<AuthConfig> {
        self.last_prompt
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Change the simulated device between operations
    pub fn update_profile(&self, f: impl FnOnce(&mut SimulatedProfile)) {
        f(&mut *self.profile());
    }

    fn profile(&self) -> MutexGuard<'_, SimulatedProfile> {
        self.profile.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BiometricPlatform for SimulatedPlatform {
    async fn has_hardware(&self) -> PlatformResult<bool> {
        bump(&self.calls.has_hardware);
        let profile = self.profile();
        injected(&profile.failures.has_hardware)?;
        Ok(profile.hardware)
    }

    async fn supported_modalities(&self) -> PlatformResult<Vec<Modality>> {
        bump(&self.calls.supported_modalities);
        let profile = self.profile();
        injected(&profile.failures.supported_modalities)?;
        if !profile.hardware {
            return Ok(Vec::new());
        }
        Ok(profile.modalities.clone())
    }

    async fn is_enrolled(&self) -> PlatformResult<bool> {
        bump(&self.calls.is_enrolled);
        let profile = self.profile();
        injected(&profile.failures.is_enrolled)?;
        Ok(profile.hardware && profile.enrolled)
    }

    async fn authenticate(&self, config: &AuthConfig) -> PlatformResult<AuthResponse> {
        bump(&self.calls.authenticate);
        *self.last_prompt.lock().unwrap_or_else(|e| e.into_inner()) = Some(config.clone());
        let (latency, outcome) = {
            let profile = self.profile();
            injected(&profile.failures.authenticate)?;
            (
                Duration::from_millis(profile.prompt_latency_ms),
                profile.outcome.clone(),
            )
        };

        tracing::debug!(prompt = %config.prompt_message, ?latency, "Simulated prompt shown");

        tokio::select! {
            _ = tokio::time::sleep(latency) => Ok(outcome.response()),
            _ = self.cancel.notified() => Ok(AuthResponse::failure(APP_CANCEL)),
        }
    }

    async fn cancel_authenticate(&self) -> PlatformResult<()> {
        bump(&self.calls.cancel_authenticate);
        injected(&self.profile().failures.cancel_authenticate)?;
        // Wakes only prompts that are currently waiting; nothing is stored
        self.cancel.notify_waiters();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "simulated"
    }
}
