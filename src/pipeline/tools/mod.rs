// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! External toolchain wrappers.
//!
//! ```text
//! BuildDriver
//!   ├── dyn Fetcher         NugetTool     <nuget> restore <solution>
//!   └── dyn ProjectBuilder  MsBuildTool   <msbuild> <project> /target:Build /property:..
//!                                 └── ToolContext: cancel token, dry-run, span, timeout
//! ```
//!
//! All tools support graceful cancellation via `CancellationToken` and
//! respect dry-run by logging the command instead of spawning it.

use std::path::Path;

use futures_util::future::BoxFuture;

use super::ToolContext;
use crate::config::types::ProjectSpec;
use crate::error::Result;

pub mod msbuild;
pub mod nuget;

/// Restores the dependencies of a solution.
pub trait Fetcher: Send + Sync {
    /// Returns the name of this tool (e.g. "nuget").
    fn name(&self) -> &str;

    /// Restores dependencies for `solution`.
    ///
    /// Returns `Ok(())` when nothing needs restoring.
    fn fetch<'a>(&'a self, ctx: &'a ToolContext, solution: &'a Path) -> BoxFuture<'a, Result<()>>;
}

/// Compiles one project.
pub trait ProjectBuilder: Send + Sync {
    /// Returns the name of this tool (e.g. "msbuild").
    fn name(&self) -> &str;

    /// Builds `project`, stamping its version first when configured.
    fn build_project<'a>(
        &'a self,
        ctx: &'a ToolContext,
        project: &'a ProjectSpec,
    ) -> BoxFuture<'a, Result<()>>;
}

#[cfg(test)]
pub(crate) mod test_utils;
#[cfg(test)]
mod tests;
