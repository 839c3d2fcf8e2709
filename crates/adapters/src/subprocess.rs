// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers

use crate::error::ExecError;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Default timeout for `!` shell commands.
/// Set to 10 minutes as a safety net for long-running user scripts.
pub const SHELL_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

/// Run a subprocess command with a timeout, aborting on cancellation.
///
/// The child is killed when the future is dropped, which covers both the
/// timeout and the cancelled branch.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
    cancel: &CancellationToken,
) -> Result<Output, ExecError> {
    cmd.kill_on_drop(true);
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ExecError::Cancelled),
        result = tokio::time::timeout(timeout, cmd.output()) => match result {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(io_err)) => Err(ExecError::CommandFailed(format!("{description}: {io_err}"))),
            Err(_elapsed) => Err(ExecError::Timeout(timeout.as_millis() as u64)),
        },
    }
}

/// Runs `! program args...` jobs.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    timeout: Duration,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(SHELL_COMMAND_TIMEOUT)
    }
}

impl ShellRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_env() -> Self {
        Self::new(crate::env::shell_timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run a program directly (no shell interpretation) and return its
    /// stdout lines. A non-zero exit is a `CommandFailed` carrying stderr.
    pub async fn run(
        &self,
        program: &str,
        args: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, ExecError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = run_with_timeout(cmd, self.timeout, program, cancel).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let status = match output.status.code() {
                Some(code) => format!("exit status {code}"),
                None => "terminated by signal".to_string(),
            };
            let detail = stderr.trim();
            return Err(ExecError::CommandFailed(if detail.is_empty() {
                format!("{program}: {status}")
            } else {
                format!("{program}: {status}: {detail}")
            }));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
