// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks (each returns its kept String)
//!   wait | timeout | cancel
//!   exited --> readers drain until EOF, at most DRAIN_GRACE
//!   killed --> readers stopped at once, partial output kept
//!   --> ProcessOutput { stdout, stderr, exit_code, interrupted, timed_out }
//!
//! read_stream()
//!   read_until('\n') --> lossy UTF-8 --> log and/or keep
//! ```

use crate::error::Result;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};

/// How the wait on a child ended.
enum Completion {
    Exited(i32),
    TimedOut,
    Interrupted,
}

/// Time the readers get to drain the pipes after the child exits.
///
/// A background process started by the child inherits its pipes and can
/// keep them open long after the child itself is gone.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Spawns a reader task for one stream.
fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    stop: &CancellationToken,
    process_name: &str,
    stream_name: &'static str,
) -> Option<JoinHandle<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    stream.map(|stream| {
        let name = process_name.to_string();
        let stop = stop.clone();
        tokio::spawn(async move { read_stream(stream, flags, stop, &name, stream_name).await })
    })
}

async fn collect(handle: Option<JoinHandle<String>>) -> String {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    }
}

async fn sleep_or_pending(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

async fn cancelled_or_pending(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

impl ProcessBuilder {
    /// Runs the child process, handling I/O streaming and waiting for completion.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: Option<&CancellationToken>,
    ) -> Result<ProcessOutput> {
        let started = Instant::now();
        let stop = CancellationToken::new();
        let stdout_handle =
            spawn_reader(child.stdout.take(), self.stdout_stream(), &stop, name, "stdout");
        let stderr_handle =
            spawn_reader(child.stderr.take(), self.stderr_stream(), &stop, name, "stderr");

        let completion = tokio::select! {
            status = child.wait() => Completion::Exited(status?.code().unwrap_or(-1)),
            () = sleep_or_pending(self.timeout_duration()) => {
                warn!(process = %name, timeout = ?self.timeout_duration(), "process timed out");
                Completion::TimedOut
            }
            () = cancelled_or_pending(token) => {
                warn!(process = %name, "cancellation requested, terminating process");
                Completion::Interrupted
            }
        };

        let (exit_code, grace) = match completion {
            Completion::Exited(code) => {
                let left = self
                    .timeout_duration()
                    .map_or(DRAIN_GRACE, |limit| limit.saturating_sub(started.elapsed()));
                (code, left.min(DRAIN_GRACE))
            }
            Completion::TimedOut | Completion::Interrupted => {
                if let Err(e) = child.kill().await {
                    debug!(process = %name, error = %e, "kill failed");
                }
                (-1, Duration::ZERO)
            }
        };

        let drain = async { tokio::join!(collect(stdout_handle), collect(stderr_handle)) };
        tokio::pin!(drain);
        let (stdout, stderr) = tokio::select! {
            output = &mut drain => output,
            () = tokio::time::sleep(grace) => {
                debug!(process = %name, "output pipes still open, stopping readers");
                stop.cancel();
                drain.await
            }
        };

        let output = ProcessOutput::new(exit_code, stdout, stderr);
        Ok(match completion {
            Completion::Exited(_) => output,
            Completion::TimedOut => output.mark_timed_out(),
            Completion::Interrupted => output.mark_interrupted(),
        })
    }
}

/// Reads a stream line by line, forwarding to the log and/or keeping it.
///
/// Bytes are decoded as lossy UTF-8 so that tools writing in a legacy code
/// page still produce readable, if imperfect, output. Stops at end of
/// stream or when `stop` fires, keeping whatever was read so far.
async fn read_stream<R>(
    reader: R,
    flags: StreamFlags,
    stop: CancellationToken,
    process_name: &str,
    stream_name: &str,
) -> String
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut kept = String::new();

    loop {
        buf.clear();
        let read = tokio::select! {
            biased;
            () = stop.cancelled() => {
                // A partial line may already sit in `buf`.
                if !buf.is_empty() {
                    emit_line(&buf, flags, &mut kept, process_name, stream_name);
                }
                break;
            }
            read = reader.read_until(b'\n', &mut buf) => read,
        };
        match read {
            Ok(0) => break,
            Ok(_) => emit_line(&buf, flags, &mut kept, process_name, stream_name),
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = %stream_name,
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }

    kept
}

fn emit_line(
    bytes: &[u8],
    flags: StreamFlags,
    kept: &mut String,
    process_name: &str,
    stream_name: &str,
) {
    let decoded = String::from_utf8_lossy(bytes);
    let line = decoded.trim_end_matches(['\r', '\n']);
    if flags.contains(StreamFlags::FORWARD_TO_LOG) {
        debug!(process = %process_name, stream = %stream_name, "{line}");
    }
    if flags.contains(StreamFlags::KEEP_IN_STRING) {
        if !kept.is_empty() {
            kept.push('\n');
        }
        kept.push_str(line);
    }
}
