// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("MSBuild.exe")
//!   .arg() .env() .log_and_capture() .timeout_opt()
//!   .run() / .run_with_cancellation()
//!       --> tokio::process::Command
//!           stream stdout/stderr
//!       --> ProcessOutput { exit_code, stdout, stderr }
//!           or ProcessError { SpawnFailed, NonZeroExit, TimedOut, Interrupted }
//! ```

pub mod builder;
mod io;
mod runner;
