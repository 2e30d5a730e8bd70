//! biocheck core - biometric authentication test harness
//!
//! This crate holds everything below the screen:
//! - The [`BiometricPlatform`] seam and its backends (simulated, fprintd)
//! - The four operations: hardware probe, enrollment probe, authenticate, cancel
//! - The newest-first activity log
//! - The state slots the presentation layer renders
//!
//! Sensor drivers, secure-enclave cryptography and liveness detection stay
//! with the platform.

pub mod error;
pub mod harness;
pub mod log;
pub mod modality;
pub mod operations;
pub mod platform;
pub mod state;

pub use error::{HarnessError, PlatformError, Result};
pub use harness::Harness;
pub use log::{ActivityLog, LogEntry, LogSink, PendingLog};
pub use modality::Modality;
pub use operations::{Action, Completion, Notice, Outcome};
pub use platform::{
    AuthConfig, AuthResponse, BiometricPlatform, FprintdConfig, FprintdPlatform,
    SimulatedPlatform, SimulatedProfile,
};
pub use state::{AuthResult, CapabilityState, EnrollmentState, HarnessState};
