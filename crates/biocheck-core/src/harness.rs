//! Platform and state bundled for straight-line use

use std::sync::Arc;

use crate::error::Result;
use crate::operations::{self, Action, Notice};
use crate::platform::BiometricPlatform;
use crate::state::{AuthResult, CapabilityState, EnrollmentState, HarnessState};

/// A platform together with the state its operations feed
///
/// Each method runs one operation with the activity log as its sink and
/// updates the matching slot on success.
pub struct Harness<P: ?Sized = dyn BiometricPlatform> {
    platform: Arc<P>,
    state: HarnessState,
}

impl<P: BiometricPlatform + ?Sized> Harness<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self {
            platform,
            state: HarnessState::new(),
        }
    }

    pub fn state(&self) -> &HarnessState {
        &self.state
    }

    /// Startup probes: hardware, then enrollment
    pub async fn mount(&mut self) {
        // Failures are already logged and leave the defaults in place
        let _ = self.probe_hardware().await;
        let _ = self.probe_enrollment().await;
    }

    pub async fn probe_hardware(&mut self) -> Result<CapabilityState> {
        let capability = operations::probe_hardware(&*self.platform, &mut self.state.log).await?;
        self.state.capability = capability.clone();
        Ok(capability)
    }

    pub async fn probe_enrollment(&mut self) -> Result<EnrollmentState> {
        let enrollment =
            operations::probe_enrollment(&*self.platform, &mut self.state.log).await?;
        self.state.enrollment = enrollment;
        Ok(enrollment)
    }

    pub async fn authenticate(&mut self) -> Result<AuthResult> {
        let result = operations::authenticate(&*self.platform, &mut self.state.log).await?;
        self.state.auth_result = Some(result.clone());
        Ok(result)
    }

    pub async fn cancel(&mut self) -> Result<()> {
        operations::cancel(&*self.platform, &mut self.state.log).await
    }

    /// Run an action and fold its completion into the state
    pub async fn perform(&mut self, action: Action) -> Option<Notice> {
        let completion = action.execute(&*self.platform).await;
        self.state.apply(completion)
    }
}
