// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build command implementation for msb-rs.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::{ConfigError, Result, bail_out};
use crate::pipeline::driver::BuildDriver;
use crate::pipeline::{BuildOutcome, Stage, ToolContext};

/// Main handler for build command.
///
/// Ctrl+C cancels the running stage.
///
/// # Errors
///
/// Returns an error if the configuration cannot drive a build or any stage
/// fails.
pub async fn run_build_command(config: Config, has_sources: bool, dry_run: bool) -> Result<()> {
    let cancel_token = CancellationToken::new();
    let signal_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, interrupting build...");
            signal_token.cancel();
        }
    });

    run_build(config, has_sources, dry_run, cancel_token).await
}

/// Runs the pipeline with an explicit cancellation token.
///
/// # Errors
///
/// - `ConfigError::NotFound` if no configuration file was loaded and nothing
///   names a solution.
/// - `ConfigError::MissingKey` / `InvalidValue` for an incomplete configuration.
/// - `MsbError::Bailed` naming the stage that aborted the build and why.
pub async fn run_build(
    config: Config,
    has_sources: bool,
    dry_run: bool,
    cancel_token: CancellationToken,
) -> Result<()> {
    if !has_sources && config.solution.path.is_none() {
        return Err(ConfigError::NotFound(DEFAULT_CONFIG_FILE.to_string()).into());
    }

    let ctx = ToolContext::new(Arc::new(config), cancel_token, dry_run);
    let mut driver = BuildDriver::new(ctx)?;

    match driver.run().await {
        BuildOutcome::Succeeded => Ok(()),
        BuildOutcome::Aborted(failure) => {
            let message = if *failure.stage() == Stage::PostBuild {
                format!("all projects built, but {failure}")
            } else {
                format!("build aborted: {failure}")
            };
            Err(bail_out(message).into())
        }
    }
}
