// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Staged build driver.
//!
//! ```text
//! BuildDriver::new(ctx)            validates config, hooks from config
//!   .with_prehook() .with_posthook() .with_fetcher() .with_builder()
//!   .run().await
//!       Idle -> PreHook -> Fetching -> Building(0) .. Building(n-1) -> PostHook -> Done
//!       first failure --> Aborted(stage), nothing after it runs
//! ```
//!
//! The project builder is located after a successful fetch unless one was
//! supplied, so a restore can install the compiler it needs.

use std::future::Future;
use std::path::PathBuf;

use tracing::{Instrument, debug, error, info, warn};

use super::hooks::Hook;
use super::tools::msbuild::MsBuildTool;
use super::tools::nuget::NugetTool;
use super::tools::{Fetcher, ProjectBuilder};
use super::{BuildOutcome, BuildState, Stage, StageFailure, ToolContext};
use crate::error::{Result, bail_out};

/// Runs the full pipeline for one solution.
pub struct BuildDriver {
    ctx: ToolContext,
    solution: PathBuf,
    prehook: Hook,
    posthook: Hook,
    fetcher: Box<dyn Fetcher>,
    builder: Option<Box<dyn ProjectBuilder>>,
    history: Vec<BuildState>,
}

impl BuildDriver {
    /// Creates a driver from the context's configuration.
    ///
    /// Hooks come from `hooks.prebuild` / `hooks.postbuild`; the fetcher is
    /// [`NugetTool`] over `build_tools.nuget`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration cannot drive a build
    /// (no solution path, unnamed project).
    pub fn new(ctx: ToolContext) -> Result<Self> {
        let config = ctx.config();
        config.validate()?;
        let solution = config.solution_path()?.to_path_buf();
        let timeout = ctx.timeout();
        let prehook = Hook::from_command_line(config.hooks.prebuild.as_deref(), timeout);
        let posthook = Hook::from_command_line(config.hooks.postbuild.as_deref(), timeout);
        let fetcher = Box::new(NugetTool::from_config(&config.build_tools.nuget));

        Ok(Self {
            ctx,
            solution,
            prehook,
            posthook,
            fetcher,
            builder: None,
            history: vec![BuildState::Idle],
        })
    }

    /// Sets the hook run before fetching.
    #[must_use]
    pub fn with_prehook(mut self, hook: Hook) -> Self {
        self.prehook = hook;
        self
    }

    /// Sets the hook run after the last project builds.
    #[must_use]
    pub fn with_posthook(mut self, hook: Hook) -> Self {
        self.posthook = hook;
        self
    }

    /// Replaces the dependency fetcher.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Replaces the project builder.
    #[must_use]
    pub fn with_builder(mut self, builder: impl ProjectBuilder + 'static) -> Self {
        self.builder = Some(Box::new(builder));
        self
    }

    /// Returns every state visited so far, starting with `Idle`.
    #[must_use]
    pub fn history(&self) -> &[BuildState] {
        &self.history
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &BuildState {
        self.history.last().unwrap_or(&BuildState::Idle)
    }

    fn transition(&mut self, state: BuildState) {
        debug!(from = ?self.state(), to = ?state, "state transition");
        self.history.push(state);
    }

    /// Runs the pipeline to completion or to its first failure.
    ///
    /// A driver runs once; later calls return the same terminal outcome
    /// kind without doing any work.
    pub async fn run(&mut self) -> BuildOutcome {
        if let BuildState::Aborted(stage) = self.state() {
            let stage = stage.clone();
            return BuildOutcome::Aborted(StageFailure::new(
                stage,
                bail_out("driver already aborted").into(),
            ));
        }
        if *self.state() == BuildState::Done {
            return BuildOutcome::Succeeded;
        }

        let span = tracing::info_span!(
            parent: self.ctx.span(),
            "build",
            solution = %self.solution.display()
        );
        self.ctx = self.ctx.clone().with_span(span.clone());
        let result = self.run_stages().instrument(span.clone()).await;
        let _enter = span.enter();

        match result {
            Ok(()) => {
                self.transition(BuildState::Done);
                info!("build completed successfully");
                BuildOutcome::Succeeded
            }
            Err(failure) => {
                self.transition(BuildState::Aborted(failure.stage().clone()));
                if *failure.stage() == Stage::PostBuild {
                    warn!(
                        error = %format!("{:#}", failure.error()),
                        "all projects built, but the post-build hook failed"
                    );
                } else {
                    error!(
                        stage = %failure.stage(),
                        error = %format!("{:#}", failure.error()),
                        "build aborted"
                    );
                }
                BuildOutcome::Aborted(failure)
            }
        }
    }

    async fn run_stages(&mut self) -> std::result::Result<(), StageFailure> {
        self.transition(BuildState::PreHook);
        self.run_hook(Stage::PreBuild).await?;

        self.transition(BuildState::Fetching);
        let fetch = self.fetcher.fetch(&self.ctx, &self.solution);
        Self::guarded(&self.ctx, Stage::Fetch, fetch).await?;

        if self.builder.is_none() {
            self.builder = Some(Box::new(MsBuildTool::locate(
                &self.ctx.config().build_tools.msbuild,
            )));
        }

        let config = self.ctx.config().clone();
        let total = config.solution.projects.len();
        for (index, project) in config.solution.projects.iter().enumerate() {
            self.transition(BuildState::Building(index));
            let stage = Stage::Build {
                index,
                name: project.name.clone(),
            };
            info!(project = %project.name, index = index + 1, total, "building project");
            let Some(builder) = self.builder.as_deref() else {
                return Err(StageFailure::new(
                    stage,
                    bail_out("no project builder").into(),
                ));
            };
            Self::guarded(&self.ctx, stage, builder.build_project(&self.ctx, project)).await?;
        }

        self.transition(BuildState::PostHook);
        self.run_hook(Stage::PostBuild).await
    }

    async fn run_hook(&self, stage: Stage) -> std::result::Result<(), StageFailure> {
        let hook = match stage {
            Stage::PostBuild => &self.posthook,
            _ => &self.prehook,
        };
        if hook.is_none() {
            debug!(%stage, "no hook configured");
            return Ok(());
        }
        if self.ctx.is_dry_run() {
            info!(%stage, hook = hook.name(), "[dry-run] Would run hook");
            return Ok(());
        }

        info!(%stage, hook = hook.name(), "running hook");
        let user_config = &self.ctx.config().user_defined_config;
        Self::guarded(&self.ctx, stage, hook.invoke(user_config)).await
    }

    /// Runs one stage, aborting it when the build is cancelled.
    async fn guarded<F>(
        ctx: &ToolContext,
        stage: Stage,
        work: F,
    ) -> std::result::Result<(), StageFailure>
    where
        F: Future<Output = Result<()>>,
    {
        let result: Result<()> = tokio::select! {
            biased;
            () = ctx.cancel_token().cancelled() => Err(bail_out("build cancelled").into()),
            result = work => result,
        };
        result.map_err(|error| StageFailure::new(stage, error))
    }
}
