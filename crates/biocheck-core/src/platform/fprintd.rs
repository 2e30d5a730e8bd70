//! Linux fingerprint daemon backend
//!
//! Drives fprintd through its stock command-line tools rather than D-Bus:
//! `fprintd-list <user>` answers the hardware and enrollment probes and
//! `fprintd-verify <user>` shows the prompt. Cancelling kills the verify
//! process.

use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::Notify;

use super::{AuthConfig, AuthResponse, BiometricPlatform, PlatformResult, APP_CANCEL};
use crate::error::PlatformError;
use crate::modality::Modality;

const NO_DEVICES: &str = "No devices available";
const VERIFY_RESULT: &str = "Verify result:";
const VERIFY_MATCH: &str = "verify-match";

/// fprintd backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FprintdConfig {
    /// User whose prints are checked; falls back to `$USER` / `$LOGNAME`
    pub username: Option<String>,
    pub list_command: String,
    pub verify_command: String,
}

impl Default for FprintdConfig {
    fn default() -> Self {
        Self {
            username: None,
            list_command: "fprintd-list".to_string(),
            verify_command: "fprintd-verify".to_string(),
        }
    }
}

/// Output of one `fprintd-list` run
struct ListOutput {
    success: bool,
    text: String,
    stderr: String,
}

/// Backend talking to fprintd
#[derive(Debug)]
pub struct FprintdPlatform {
    config: FprintdConfig,
    cancel: Notify,
}

impl FprintdPlatform {
    pub fn new(config: FprintdConfig) -> Self {
        Self {
            config,
            cancel: Notify::new(),
        }
    }

    fn username(&self) -> PlatformResult<String> {
        self.config
            .username
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("LOGNAME").ok())
            .ok_or_else(|| PlatformError::new("Cannot determine user name for fprintd"))
    }

    async fn list(&self) -> PlatformResult<ListOutput> {
        let user = self.username()?;
        let output = Command::new(&self.config.list_command)
            .arg(&user)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                PlatformError::new(format!("Failed to run {}: {}", self.config.list_command, e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        Ok(ListOutput {
            success: output.status.success(),
            text: format!("{}\n{}", stdout, stderr),
            stderr,
        })
    }

    /// Run `fprintd-list` and fail unless it succeeded or reported no devices
    async fn checked_list(&self) -> PlatformResult<ListOutput> {
        let output = self.list().await?;
        if !output.success && !output.text.contains(NO_DEVICES) {
            return Err(command_error(&self.config.list_command, &output.stderr));
        }
        Ok(output)
    }
}

fn command_error(command: &str, stderr: &str) -> PlatformError {
    let detail = stderr.trim();
    if detail.is_empty() {
        PlatformError::new(format!("{} failed", command))
    } else {
        PlatformError::new(format!("{} failed: {}", command, detail))
    }
}

async fn read_pipe<R>(pipe: Option<R>) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut bytes).await?;
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Whether `fprintd-list` output names at least one device
pub fn parse_device_present(output: &str) -> bool {
    if output.contains(NO_DEVICES) {
        return false;
    }
    for line in output.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("found ") {
            if let Some(count) = rest.split_whitespace().next() {
                return count.parse::<u32>().map(|n| n > 0).unwrap_or(false);
            }
        }
    }
    output.contains("Using device")
}

/// Whether `fprintd-list` output lists any enrolled finger
pub fn parse_enrolled(output: &str) -> bool {
    output
        .lines()
        .any(|line| line.trim_start().starts_with("- #"))
}

/// The last verify result token in `fprintd-verify` output
pub fn parse_verify_result(output: &str) -> Option<String> {
    output
        .lines()
        .filter_map(|line| line.split_once(VERIFY_RESULT).map(|(_, rest)| rest))
        .filter_map(|rest| rest.split_whitespace().next())
        .last()
        .map(str::to_string)
}

#[async_trait]
impl BiometricPlatform for FprintdPlatform {
    async fn has_hardware(&self) -> PlatformResult<bool> {
        let output = self.checked_list().await?;
        Ok(parse_device_present(&output.text))
    }

    async fn supported_modalities(&self) -> PlatformResult<Vec<Modality>> {
        if self.has_hardware().await? {
            Ok(vec![Modality::Fingerprint])
        } else {
            Ok(Vec::new())
        }
    }

    async fn is_enrolled(&self) -> PlatformResult<bool> {
        let output = self.checked_list().await?;
        Ok(parse_device_present(&output.text) && parse_enrolled(&output.text))
    }

    async fn authenticate(&self, config: &AuthConfig) -> PlatformResult<AuthResponse> {
        let user = self.username()?;
        tracing::debug!(
            prompt = %config.prompt_message,
            fallback = config.allow_device_fallback,
            "Starting fprintd-verify; prompt labels and device fallback are not supported"
        );

        let mut child = Command::new(&self.config.verify_command)
            .arg(&user)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PlatformError::new(format!(
                    "Failed to run {}: {}",
                    self.config.verify_command, e
                ))
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Pipes are drained alongside the wait; a full pipe blocks the child
        let run = async { tokio::join!(child.wait(), read_pipe(stdout), read_pipe(stderr)) };
        let finished = tokio::select! {
            done = run => Some(done),
            _ = self.cancel.notified() => None,
        };

        let Some((status, out, err)) = finished else {
            if let Err(e) = child.kill().await {
                tracing::warn!("Failed to stop {}: {}", self.config.verify_command, e);
            }
            return Ok(AuthResponse::failure(APP_CANCEL));
        };
        let status = status?;
        let out = out?;
        let err = err?;

        match parse_verify_result(&out) {
            Some(result) if result == VERIFY_MATCH => Ok(AuthResponse::success()),
            Some(result) => Ok(AuthResponse::failure(result)),
            None if status.success() => Ok(AuthResponse::success()),
            None => Err(command_error(&self.config.verify_command, &err)),
        }
    }

    async fn cancel_authenticate(&self) -> PlatformResult<()> {
        self.cancel.notify_waiters();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "fprintd"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTED: &str = "found 1 devices\n\
        Device at /net/reactivated/Fprint/Device/0\n\
        Using device /net/reactivated/Fprint/Device/0\n\
        Fingerprints for user alex on Synaptics Sensors (press):\n \
        - #0: right-index-finger\n";

    const NONE_ENROLLED: &str = "found 1 devices\n\
        Device at /net/reactivated/Fprint/Device/0\n\
        Using device /net/reactivated/Fprint/Device/0\n\
        User alex has no fingers enrolled for Synaptics Sensors.\n";

    #[test]
    fn test_device_detection() {
        assert!(parse_device_present(LISTED));
        assert!(parse_device_present(NONE_ENROLLED));
        assert!(!parse_device_present("No devices available\n"));
        assert!(!parse_device_present("found 0 devices\n"));
    }

    #[test]
    fn test_enrollment_detection() {
        assert!(parse_enrolled(LISTED));
        assert!(!parse_enrolled(NONE_ENROLLED));
    }

    #[test]
    fn test_verify_result() {
        let out = "Using device /net/reactivated/Fprint/Device/0\n\
            Listing enrolled fingers:\n \
            - #0: right-index-finger\n\
            Verify started!\n\
            Verifying: right-index-finger\n\
            Verify result: verify-no-match (done)\n";
        assert_eq!(parse_verify_result(out).as_deref(), Some("verify-no-match"));
        assert_eq!(
            parse_verify_result("Verify result: verify-match (done)\n").as_deref(),
            Some(VERIFY_MATCH)
        );
        assert_eq!(parse_verify_result("Verify started!\n"), None);
    }

    #[tokio::test]
    async fn test_missing_tool_is_platform_error() {
        let platform = FprintdPlatform::new(FprintdConfig {
            username: Some("nobody".to_string()),
            list_command: "biocheck-no-such-fprintd-list".to_string(),
            verify_command: "biocheck-no-such-fprintd-verify".to_string(),
        });

        let err = platform.has_hardware().await.unwrap_err();
        assert!(err.message.contains("biocheck-no-such-fprintd-list"));

        let err = platform
            .authenticate(&AuthConfig::default())
            .await
            .unwrap_err();
        assert!(err.message.contains("biocheck-no-such-fprintd-verify"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_verify_output_larger_than_pipe_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("verify.sh");
        std::fs::write(
            &script,
            "head -c 200000 /dev/zero | tr '\\0' x\n\
             head -c 200000 /dev/zero | tr '\\0' y >&2\n\
             echo\n\
             echo 'Verify result: verify-match (done)'\n",
        )
        .unwrap();

        // The user name is passed as the only argument, so `sh <script>` runs it
        let platform = FprintdPlatform::new(FprintdConfig {
            username: Some(script.display().to_string()),
            list_command: "fprintd-list".to_string(),
            verify_command: "sh".to_string(),
        });

        let response = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            platform.authenticate(&AuthConfig::default()),
        )
        .await
        .expect("verify should finish")
        .unwrap();
        assert_eq!(response, AuthResponse::success());
    }

    #[tokio::test]
    async fn test_cancel_without_prompt_is_ok() {
        let platform = FprintdPlatform::new(FprintdConfig::default());
        assert!(platform.cancel_authenticate().await.is_ok());
    }
}
