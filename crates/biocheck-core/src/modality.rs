//! Biometric modalities reported by the platform

use std::fmt;

use serde::{Deserialize, Serialize};

/// Platform code for fingerprint readers
pub const FINGERPRINT_CODE: u8 = 1;
/// Platform code for facial recognition
pub const FACIAL_RECOGNITION_CODE: u8 = 2;
/// Platform code for iris scanners
pub const IRIS_CODE: u8 = 3;

/// A biometric input method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Modality {
    Fingerprint,
    Face,
    Iris,
    /// A type code this harness has no name for
    Other(u8),
}

impl Modality {
    /// Map a platform type code to a modality
    pub fn from_code(code: u8) -> Self {
        match code {
            FINGERPRINT_CODE => Modality::Fingerprint,
            FACIAL_RECOGNITION_CODE => Modality::Face,
            IRIS_CODE => Modality::Iris,
            other => Modality::Other(other),
        }
    }

    /// The platform type code
    pub fn code(&self) -> u8 {
        match self {
            Modality::Fingerprint => FINGERPRINT_CODE,
            Modality::Face => FACIAL_RECOGNITION_CODE,
            Modality::Iris => IRIS_CODE,
            Modality::Other(code) => *code,
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> String {
        match self {
            Modality::Fingerprint => "Fingerprint".to_string(),
            Modality::Face => "Face ID".to_string(),
            Modality::Iris => "Iris".to_string(),
            Modality::Other(code) => format!("Type {}", code),
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl From<u8> for Modality {
    fn from(code: u8) -> Self {
        Modality::from_code(code)
    }
}

impl From<Modality> for u8 {
    fn from(modality: Modality) -> Self {
        modality.code()
    }
}

/// Join display names with ", ", or "none" for an empty list
pub fn describe(modalities: &[Modality]) -> String {
    if modalities.is_empty() {
        return "none".to_string();
    }
    modalities
        .iter()
        .map(Modality::display_name)
        .collect::<Vec<_>>()
        .join(", ")
}
