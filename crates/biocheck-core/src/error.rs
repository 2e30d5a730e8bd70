//! Error types for the biocheck harness

use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Failure reported by the platform biometric API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PlatformError {
    /// Platform-provided description
    pub message: String,
}

impl PlatformError {
    /// Create a platform error from any message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for PlatformError {
    fn from(e: std::io::Error) -> Self {
        PlatformError::new(e.to_string())
    }
}

/// Errors surfaced at an operation boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    /// The platform call itself failed
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Authenticate was requested but no biometric hardware is present
    #[error("Biometric hardware not available")]
    HardwareUnavailable,

    /// Authenticate was requested but nothing is enrolled
    #[error("No biometrics enrolled")]
    NotEnrolled,
}

impl HarnessError {
    /// Whether this error came from a precondition check rather than the platform
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            HarnessError::HardwareUnavailable | HarnessError::NotEnrolled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_error_display_is_bare_message() {
        let err = HarnessError::from(PlatformError::new("sensor busy"));
        assert_eq!(err.to_string(), "sensor busy");
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_precondition_messages() {
        assert_eq!(
            HarnessError::HardwareUnavailable.to_string(),
            "Biometric hardware not available"
        );
        assert_eq!(HarnessError::NotEnrolled.to_string(), "No biometrics enrolled");
        assert!(HarnessError::NotEnrolled.is_precondition());
    }
}
