//! Platform biometric API abstraction
//!
//! The harness never talks to sensors itself. Each backend wraps whatever the
//! host offers for biometric checks behind [`BiometricPlatform`]:
//! - `simulated` - scripted profile, the default and the test double
//! - `fprintd` - the Linux fingerprint daemon via its command-line tools

pub mod fprintd;
pub mod simulated;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PlatformError;
use crate::modality::Modality;

pub use fprintd::{FprintdConfig, FprintdPlatform};
pub use simulated::{ScriptedOutcome, SimulatedPlatform, SimulatedProfile};

/// Result type for raw platform calls
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// Error code reported when a prompt is dismissed by the application
pub const APP_CANCEL: &str = "app_cancel";

/// Prompt configuration passed to the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    pub prompt_message: String,
    pub fallback_label: String,
    pub cancel_label: String,
    /// Whether the device PIN/pattern fallback is allowed
    pub allow_device_fallback: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            prompt_message: "Authenticate to continue".to_string(),
            fallback_label: "Use passcode".to_string(),
            cancel_label: "Cancel".to_string(),
            allow_device_fallback: true,
        }
    }
}

/// Raw payload returned by the platform prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl AuthResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
            warning: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            warning: None,
        }
    }

    /// JSON rendering used in the activity log
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// The biometric operations a host platform must provide
#[async_trait]
pub trait BiometricPlatform: Send + Sync {
    /// Whether biometric hardware exists on this device
    async fn has_hardware(&self) -> PlatformResult<bool>;

    /// Modalities the hardware supports
    async fn supported_modalities(&self) -> PlatformResult<Vec<Modality>>;

    /// Whether the user has at least one enrolled credential
    async fn is_enrolled(&self) -> PlatformResult<bool>;

    /// Show the authentication prompt and wait for its outcome
    async fn authenticate(&self, config: &AuthConfig) -> PlatformResult<AuthResponse>;

    /// Dismiss any in-flight prompt; a no-op when none is showing
    async fn cancel_authenticate(&self) -> PlatformResult<()>;

    /// Short backend identifier for display
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_config() {
        let config = AuthConfig::default();
        assert_eq!(config.prompt_message, "Authenticate to continue");
        assert_eq!(config.fallback_label, "Use passcode");
        assert_eq!(config.cancel_label, "Cancel");
        assert!(config.allow_device_fallback);
    }

    #[test]
    fn test_response_json_omits_absent_fields() {
        assert_eq!(AuthResponse::success().to_json(), r#"{"success":true}"#);
        assert_eq!(
            AuthResponse::failure("user_cancel").to_json(),
            r#"{"success":false,"error":"user_cancel"}"#
        );
    }
}
