// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `NuGet` package restore.
//!
//! ```text
//! NugetTool::fetch(solution)
//!   solution missing?           --> FsError::NotFound
//!   packages.config under dir?  no --> Ok (nothing spawned)
//!   locate nuget.exe in roots   none --> ProcessError::ExecutableNotFound
//!   <nuget> restore <solution>  exit != 0 --> ProcessError::NonZeroExit
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use futures_util::future::BoxFuture;
use tracing::{Instrument, debug, error, info};

use super::Fetcher;
use crate::config::types::ToolConfig;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{FsError, ProcessError, Result};
use crate::pipeline::ToolContext;
use crate::utility::fs::containing_dir;
use crate::utility::fs::search::PathSearcher;

/// Default restore tool executable.
pub const NUGET_EXE: &str = "nuget.exe";

/// Restore sub-command.
pub const RESTORE: &str = "restore";

/// Sentinel whose presence under the solution directory triggers a restore.
pub const PACKAGES_CONFIG: &str = "packages.config";

/// `NuGet` restore tool.
#[derive(Debug, Clone)]
pub struct NugetTool {
    roots: Vec<String>,
    executable: String,
    searcher: PathSearcher,
}

impl NugetTool {
    /// Creates a tool with the given search roots and the default executable.
    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            executable: NUGET_EXE.to_string(),
            searcher: PathSearcher::new(),
        }
    }

    /// Creates a tool from `build_tools.nuget`.
    #[must_use]
    pub fn from_config(config: &ToolConfig) -> Self {
        Self::new(config.paths.iter().cloned()).with_executable(config.executable_or(NUGET_EXE))
    }

    /// Overrides the executable file name searched for under the roots.
    #[must_use]
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Returns the configured search roots, unexpanded.
    #[must_use]
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Returns the executable file name.
    #[must_use]
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Returns the restore sentinel for `solution`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `FsError::NotFound` if `solution` is not an existing file.
    pub fn find_sentinel(&self, solution: &Path) -> Result<Option<PathBuf>> {
        if !solution.is_file() {
            return Err(FsError::NotFound(solution.display().to_string()).into());
        }
        Ok(self
            .searcher
            .find_in_dir(containing_dir(solution), PACKAGES_CONFIG))
    }

    /// Locates the restore tool in the configured roots.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if no root is configured or
    /// none of them yields the executable.
    pub fn locate(&self) -> Result<PathBuf> {
        let not_found = || ProcessError::ExecutableNotFound {
            name: self.executable.clone(),
            roots: self.roots.clone(),
        };
        if self.roots.is_empty() {
            return Err(not_found().into());
        }
        self.searcher
            .find(&self.roots, &self.executable)
            .ok_or_else(|| not_found().into())
    }

    async fn do_fetch(&self, ctx: &ToolContext, solution: &Path) -> Result<()> {
        let sentinel = match self.find_sentinel(solution) {
            Ok(sentinel) => sentinel,
            Err(e) => {
                error!(solution = %solution.display(), "solution file not found");
                return Err(e);
            }
        };

        let Some(sentinel) = sentinel else {
            info!("no {PACKAGES_CONFIG} found, nothing to restore");
            return Ok(());
        };
        debug!(sentinel = %sentinel.display(), "restore needed");

        let nuget = self.locate()?;
        let builder = ProcessBuilder::new(&nuget)
            .arg(RESTORE)
            .arg(solution)
            .name("nuget")
            .log_and_capture()
            .timeout_opt(ctx.timeout());

        if ctx.is_dry_run() {
            info!(
                command = %builder.command_line(),
                "[dry-run] Would restore packages with NuGet"
            );
            return Ok(());
        }

        info!(tool = %nuget.display(), "restoring packages");
        builder
            .run_with_cancellation(ctx.cancel_token().clone())
            .await
            .with_context(|| format!("Failed to restore packages for {}", solution.display()))?;

        info!("NuGet restore completed successfully");
        Ok(())
    }
}

impl Fetcher for NugetTool {
    fn name(&self) -> &'static str {
        "nuget"
    }

    fn fetch<'a>(&'a self, ctx: &'a ToolContext, solution: &'a Path) -> BoxFuture<'a, Result<()>> {
        let span = tracing::info_span!(
            parent: ctx.span(),
            "nuget",
            solution = %solution.display()
        );
        Box::pin(self.do_fetch(ctx, solution).instrument(span))
    }
}

#[cfg(test)]
mod tests;
