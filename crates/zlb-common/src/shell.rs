//! Shell command execution utilities for the LBaaS driver.
//!
//! The driver shells out to `zorpctl` to restart the proxy's managed
//! instances after every configuration change.
//!
//! # Example
//!
//! ```ignore
//! use zlb_common::shell::{self, SUDO_CMD, ZORPCTL_CMD};
//!
//! let cmd = format!("{} {} restart", SUDO_CMD, ZORPCTL_CMD);
//! let result = shell::exec(&cmd).await?;
//! ```

use std::process::Stdio;
use tokio::process::Command;

use crate::error::{LbError, LbResult};

/// Path to the `zorpctl` control utility for the Zorp proxy.
pub const ZORPCTL_CMD: &str = "/usr/sbin/zorpctl";

/// Path to the `sudo` command.
pub const SUDO_CMD: &str = "/usr/bin/sudo";

/// Result of a shell command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// The exit code of the command (0 = success).
    pub exit_code: i32,
    /// The combined stdout output.
    pub stdout: String,
    /// The combined stderr output.
    pub stderr: String,
}

impl ExecResult {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the combined output (stdout + stderr) for error messages.
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Executes a shell command asynchronously.
///
/// The command runs through `/bin/sh -c` to support pipes, redirects
/// and command chaining.
pub async fn exec(cmd: &str) -> LbResult<ExecResult> {
    tracing::debug!(command = %cmd, "Executing shell command");

    let output = Command::new("/bin/sh")
        .arg("-c")
        .arg(cmd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| LbError::ShellExec {
            command: cmd.to_string(),
            source: e,
        })?;

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    let result = ExecResult {
        exit_code,
        stdout,
        stderr,
    };

    if result.success() {
        tracing::trace!(command = %cmd, exit_code = exit_code, "Command succeeded");
    } else {
        tracing::warn!(
            command = %cmd,
            exit_code = exit_code,
            stderr = %result.stderr,
            "Command failed"
        );
    }

    Ok(result)
}

/// Executes a shell command and returns an error on non-zero exit.
///
/// Returns the stdout output on success.
pub async fn exec_or_throw(cmd: &str) -> LbResult<String> {
    let result = exec(cmd).await?;
    if result.success() {
        Ok(result.stdout)
    } else {
        Err(LbError::ShellCommandFailed {
            command: cmd.to_string(),
            exit_code: result.exit_code,
            output: result.combined_output(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_paths_are_absolute() {
        assert!(ZORPCTL_CMD.starts_with('/'));
        assert!(SUDO_CMD.starts_with('/'));
    }

    #[test]
    fn test_exec_result_success() {
        let result = ExecResult {
            exit_code: 0,
            stdout: "output".to_string(),
            stderr: "".to_string(),
        };
        assert!(result.success());
        assert_eq!(result.combined_output(), "output");
    }

    #[test]
    fn test_exec_result_combined() {
        let result = ExecResult {
            exit_code: 1,
            stdout: "stdout".to_string(),
            stderr: "stderr".to_string(),
        };
        assert!(!result.success());
        assert_eq!(result.combined_output(), "stdout\nstderr");
    }

    #[tokio::test]
    async fn test_exec_echo() {
        let result = exec("echo hello").await.unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "hello");
    }

    #[tokio::test]
    async fn test_exec_failure() {
        let result = exec("exit 42").await.unwrap();
        assert!(!result.success());
        assert_eq!(result.exit_code, 42);
    }

    #[tokio::test]
    async fn test_exec_or_throw_success() {
        let output = exec_or_throw("echo success").await.unwrap();
        assert_eq!(output, "success");
    }

    #[tokio::test]
    async fn test_exec_or_throw_failure() {
        let result = exec_or_throw("exit 1").await;
        match result {
            Err(LbError::ShellCommandFailed { exit_code, .. }) => {
                assert_eq!(exit_code, 1);
            }
            _ => panic!("Expected ShellCommandFailed error"),
        }
    }
}
