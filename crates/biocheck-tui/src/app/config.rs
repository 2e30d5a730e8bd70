//! TUI configuration
//!
//! Read once at startup; the harness never writes it back.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use biocheck_core::{
    BiometricPlatform, FprintdConfig, FprintdPlatform, SimulatedPlatform, SimulatedProfile,
};
use serde::{Deserialize, Serialize};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "biocheck";

/// Which platform backend to drive
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Scripted device from the `simulated` profile
    #[default]
    Simulated,
    /// Linux fprintd via fprintd-list / fprintd-verify
    Fprintd,
}

/// TUI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    #[serde(default)]
    pub backend: BackendKind,

    /// Device profile for the simulated backend
    #[serde(default)]
    pub simulated: SimulatedProfile,

    /// Settings for the fprintd backend
    #[serde(default)]
    pub fprintd: FprintdConfig,

    /// Redraw interval for the clock
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Where tracing output goes; discarded when unset
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_tick_rate_ms() -> u64 {
    250
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            simulated: SimulatedProfile::default(),
            fprintd: FprintdConfig::default(),
            tick_rate_ms: default_tick_rate_ms(),
            log_file: None,
        }
    }
}

impl TuiConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        // Try XDG_CONFIG_HOME first, then fall back to ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config).join(CONFIG_DIR_NAME);
            return Some(path);
        }

        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location
    ///
    /// Returns default configuration if file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        }
    }

    /// Load from `path`, falling back to defaults when missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config file {:?}: {}", path, e);
            Self::default()
        })
    }

    /// Load from `path`, reporting any error
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    /// Construct the configured platform backend
    pub fn build_platform(&self) -> Arc<dyn BiometricPlatform> {
        match self.backend {
            BackendKind::Simulated => Arc::new(SimulatedPlatform::new(self.simulated.clone())),
            BackendKind::Fprintd => Arc::new(FprintdPlatform::new(self.fprintd.clone())),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use biocheck_core::platform::ScriptedOutcome;
    use biocheck_core::Modality;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert_eq!(config.backend, BackendKind::Simulated);
        assert_eq!(config.tick_rate(), Duration::from_millis(250));
        assert!(config.log_file.is_none());
        assert_eq!(config.build_platform().backend_name(), "simulated");
    }

    #[test]
    fn test_partial_config() {
        let config: TuiConfig = serde_json::from_str(
            r#"{
                "backend": "fprintd",
                "fprintd": { "username": "alex" },
                "simulated": { "modalities": [2], "outcome": { "kind": "failure", "reason": "lockout" } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendKind::Fprintd);
        assert_eq!(config.fprintd.username.as_deref(), Some("alex"));
        assert_eq!(config.fprintd.verify_command, "fprintd-verify");
        assert_eq!(config.simulated.modalities, vec![Modality::Face]);
        assert_eq!(
            config.simulated.outcome,
            ScriptedOutcome::Failure {
                reason: "lockout".to_string()
            }
        );
        assert_eq!(config.tick_rate_ms, 250);
        assert_eq!(config.build_platform().backend_name(), "fprintd");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tick_rate_ms": 100, "log_file": "/tmp/biocheck.log" }}"#).unwrap();

        let config = TuiConfig::load_from(file.path()).unwrap();
        assert_eq!(config.tick_rate_ms, 100);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/biocheck.log")));
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            TuiConfig::load_from(file.path()),
            Err(ConfigError::Parse(_))
        ));
        let config = TuiConfig::load_or_default(file.path());
        assert_eq!(config.backend, BackendKind::Simulated);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = TuiConfig::load_or_default(&dir.path().join("absent.json"));
        assert_eq!(config.tick_rate_ms, 250);
    }
}
