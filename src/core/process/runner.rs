// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run() / run_with_cancellation(token)
//!              |
//!              v
//!     build_command()
//!     args, env, piped stdio
//!              |
//!              v
//!          spawn()  --fail-->  ProcessError::SpawnFailed
//!              |
//!              v
//!         run_child()
//!     wait | timeout | cancel
//!              |
//!              v
//!    interrupted?  --> ProcessError::Interrupted
//!    timed out?    --> ProcessError::TimedOut
//!    exit code != 0
//!    (skip if ALLOW_FAILURE) --> ProcessError::NonZeroExit
//!              |
//!              v
//!       ProcessOutput
//!    { exit_code, stdout, stderr }
//! ```

use crate::error::{ProcessError, Result};
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};

impl ProcessBuilder {
    /// Returns the display name for this process.
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessError`] if:
    /// - Spawning the child process fails (`SpawnFailed`).
    /// - The timeout elapses (`TimedOut`).
    /// - The exit code is non-zero and `ALLOW_FAILURE` is not set
    ///   (`NonZeroExit`, carrying captured stdout/stderr).
    pub async fn run(self) -> Result<ProcessOutput> {
        self.execute(None).await
    }

    /// Spawns and runs the process with cancellation support.
    ///
    /// Similar to `run()`, but when `token` is cancelled the process is killed
    /// and `ProcessError::Interrupted` is returned, regardless of `ALLOW_FAILURE`.
    /// A token that is already cancelled prevents the spawn entirely.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run), plus `Interrupted`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use tokio_util::sync::CancellationToken;
    /// use msb_rs::core::process::builder::ProcessBuilder;
    ///
    /// let token = CancellationToken::new();
    /// let output = ProcessBuilder::new("MSBuild.exe")
    ///     .arg("App.csproj")
    ///     .run_with_cancellation(token)
    ///     .await?;
    /// ```
    pub async fn run_with_cancellation(self, token: CancellationToken) -> Result<ProcessOutput> {
        self.execute(Some(&token)).await
    }

    async fn execute(self, token: Option<&CancellationToken>) -> Result<ProcessOutput> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if token.is_some_and(CancellationToken::is_cancelled) {
            return Err(ProcessError::Interrupted { command: cmd_line }.into());
        }

        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();

        let mut child = command
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                source,
            })?;

        let pid = child.id();
        trace!(process = %name, pid = ?pid, "spawned");

        let output = self.run_child(&name, &mut child, token).await?;

        if output.is_interrupted() {
            return Err(ProcessError::Interrupted { command: cmd_line }.into());
        }

        if output.is_timed_out() {
            let seconds = self.timeout_duration().map_or(0, |d| d.as_secs());
            return Err(ProcessError::TimedOut {
                command: cmd_line,
                seconds,
            }
            .into());
        }

        if !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE) && !output.success() {
            if !output.stderr().is_empty() {
                error!(process = %name, stderr = %output.stderr(), "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: cmd_line,
                code: output.exit_code(),
                stdout: output.stdout().to_string(),
                stderr: output.stderr().to_string(),
            }
            .into());
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());

        command.args(self.args_slice());

        command.envs(self.environment());

        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        command.kill_on_drop(true);

        command
    }
}
