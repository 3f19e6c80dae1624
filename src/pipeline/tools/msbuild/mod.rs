// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `MSBuild` project compilation.
//!
//! ```text
//! MsBuildTool::locate(build_tools.msbuild)     searched once
//!   build_project(project)
//!     compiler missing?        --> ProcessError::ExecutableNotFound
//!     versioning set?          --> stamp AssemblyInfo.cs (best effort)
//!     project file missing?    --> FsError::NotFound
//!     <msbuild> <project> /target:Build [/property:k1=v1;k2=v2]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use futures_util::future::BoxFuture;
use tracing::{Instrument, debug, info, warn};

use super::ProjectBuilder;
use crate::config::types::{ProjectSpec, ToolConfig};
use crate::core::process::builder::ProcessBuilder;
use crate::error::{FsError, ProcessError, Result};
use crate::pipeline::ToolContext;
use crate::utility::fs::search::PathSearcher;
use crate::versioning::{self, VersioningSpec};

/// Default compiler executable.
pub const MSBUILD_EXE: &str = "MSBuild.exe";

/// Source file holding the assembly version declarations.
pub const ASSEMBLY_INFO: &str = "AssemblyInfo.cs";

/// Build target switch.
pub const BUILD_TARGET: &str = "/target:Build";

/// Property switch prefix.
pub const PROPERTY_SWITCH: &str = "/property:";

/// `MSBuild` project builder.
///
/// The compiler is resolved once, when the tool is created.
#[derive(Debug, Clone)]
pub struct MsBuildTool {
    compiler: Option<PathBuf>,
    executable: String,
    roots: Vec<String>,
    searcher: PathSearcher,
}

impl MsBuildTool {
    /// Searches `build_tools.msbuild` for the compiler.
    #[must_use]
    pub fn locate(config: &ToolConfig) -> Self {
        let searcher = PathSearcher::new();
        let executable = config.executable_or(MSBUILD_EXE).to_string();
        let compiler = searcher.find(&config.paths, &executable);
        match &compiler {
            Some(path) => debug!(compiler = %path.display(), "MSBuild located"),
            None => debug!(executable, "MSBuild not located"),
        }
        Self {
            compiler,
            executable,
            roots: config.paths.clone(),
            searcher,
        }
    }

    /// Uses a known compiler path without searching.
    #[must_use]
    pub fn with_compiler(path: impl Into<PathBuf>) -> Self {
        Self {
            compiler: Some(path.into()),
            executable: MSBUILD_EXE.to_string(),
            roots: Vec::new(),
            searcher: PathSearcher::new(),
        }
    }

    #[must_use]
    pub fn compiler(&self) -> Option<&Path> {
        self.compiler.as_deref()
    }

    /// Renders `/property:k1=v1;k2=v2` in key order; `None` for an empty map.
    #[must_use]
    pub fn property_argument(properties: &BTreeMap<String, String>) -> Option<String> {
        if properties.is_empty() {
            return None;
        }
        let joined = properties
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(";");
        Some(format!("{PROPERTY_SWITCH}{joined}"))
    }

    /// Assembles the compiler invocation for `project`.
    #[must_use]
    pub fn command(compiler: &Path, project: &ProjectSpec) -> ProcessBuilder {
        let mut builder = ProcessBuilder::new(compiler)
            .arg(&project.path)
            .arg(BUILD_TARGET)
            .name("msbuild");
        if let Some(properties) = Self::property_argument(&project.build_properties) {
            builder = builder.arg(properties);
        }
        builder
    }

    fn compiler_required(&self) -> Result<&Path> {
        self.compiler.as_deref().ok_or_else(|| {
            ProcessError::ExecutableNotFound {
                name: self.executable.clone(),
                roots: self.roots.clone(),
            }
            .into()
        })
    }

    /// Bumps the project's assembly version. Failures are logged, never returned.
    async fn stamp_version(&self, ctx: &ToolContext, project: &ProjectSpec, spec: &VersioningSpec) {
        let Some(info_file) = self.searcher.find_in_dir(project.directory(), ASSEMBLY_INFO) else {
            warn!(
                dir = %project.directory().display(),
                "{ASSEMBLY_INFO} not found, version left unchanged"
            );
            return;
        };

        if ctx.is_dry_run() {
            info!(
                file = %info_file.display(),
                spec = %spec,
                "[dry-run] Would stamp assembly version"
            );
            return;
        }

        match versioning::increment(&info_file, spec).await {
            Ok(report) if report.changes().is_empty() && spec.has_placeholder() => {
                warn!(file = %info_file.display(), "no version declaration found");
            }
            Ok(_) => {}
            Err(e) => warn!(
                file = %info_file.display(),
                error = %format!("{e:#}"),
                "version stamping failed, continuing build"
            ),
        }
    }

    async fn do_build(&self, ctx: &ToolContext, project: &ProjectSpec) -> Result<()> {
        let compiler = self.compiler_required()?;

        if let Some(spec) = &project.versioning {
            self.stamp_version(ctx, project, spec).await;
        }

        if !project.path.is_file() {
            return Err(FsError::NotFound(project.path.display().to_string()).into());
        }

        let builder = Self::command(compiler, project)
            .log_and_capture()
            .timeout_opt(ctx.timeout());

        if ctx.is_dry_run() {
            info!(
                command = %builder.command_line(),
                "[dry-run] Would build with MSBuild"
            );
            return Ok(());
        }

        info!("building");
        builder
            .run_with_cancellation(ctx.cancel_token().clone())
            .await
            .with_context(|| format!("Failed to build project {}", project.name))?;

        info!("MSBuild build completed successfully");
        Ok(())
    }
}

impl ProjectBuilder for MsBuildTool {
    fn name(&self) -> &'static str {
        "msbuild"
    }

    fn build_project<'a>(
        &'a self,
        ctx: &'a ToolContext,
        project: &'a ProjectSpec,
    ) -> BoxFuture<'a, Result<()>> {
        let span = tracing::info_span!(
            parent: ctx.span(),
            "msbuild",
            project = %project.name
        );
        Box::pin(self.do_build(ctx, project).instrument(span))
    }
}
