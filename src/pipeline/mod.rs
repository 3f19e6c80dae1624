// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build pipeline: shared execution context, stages and outcomes.
//!
//! ```text
//! BuildDriver ──> ToolContext ──> Fetcher / ProjectBuilder ──> ProcessBuilder
//!                   config (Arc), cancel token, dry-run, span, timeout
//!
//! Idle -> PreHook -> Fetching -> Building(0..n) -> PostHook -> Done
//!            \          \            \               \
//!             +----------+------------+---------------+--> Aborted(stage)
//! ```

pub mod driver;
pub mod hooks;
pub mod tools;


use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Context provided to pipeline components during execution.
///
/// Components log under [`span`](Self::span) rather than creating their
/// own root spans, so a caller decides where their diagnostics go.
#[derive(Clone)]
pub struct ToolContext {
    cancel_token: CancellationToken,
    dry_run: bool,
    config: Arc<Config>,
    span: tracing::Span,
}

impl ToolContext {
    /// Creates a new `ToolContext` logging under the current span.
    #[must_use]
    pub fn new(config: Arc<Config>, cancel_token: CancellationToken, dry_run: bool) -> Self {
        Self {
            cancel_token,
            dry_run,
            config,
            span: tracing::Span::current(),
        }
    }

    /// Replaces the diagnostics span.
    #[must_use]
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    /// Returns the shared configuration.
    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Returns the token that interrupts running stages.
    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    /// Returns the span stage spans are parented to.
    #[must_use]
    pub const fn span(&self) -> &tracing::Span {
        &self.span
    }

    /// Returns whether this is a dry-run execution.
    ///
    /// Components still locate tools and inspect files but spawn nothing.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Per-process time limit from `process.timeout_secs`.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.config.process.timeout()
    }
}

/// One pipeline phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    PreBuild,
    Fetch,
    Build { index: usize, name: String },
    PostBuild,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreBuild => f.write_str("prebuild"),
            Self::Fetch => f.write_str("fetch"),
            Self::Build { name, .. } => write!(f, "build {name}"),
            Self::PostBuild => f.write_str("postbuild"),
        }
    }
}

/// Driver state. `Done` and `Aborted` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    PreHook,
    Fetching,
    /// Building the project at this index.
    Building(usize),
    PostHook,
    Done,
    Aborted(Stage),
}

impl BuildState {
    /// Returns true for `Done` and `Aborted`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted(_))
    }
}

/// The first failure of a run and the stage it happened in.
#[derive(Debug)]
pub struct StageFailure {
    stage: Stage,
    error: anyhow::Error,
}

impl StageFailure {
    /// Pairs a failed stage with its error.
    #[must_use]
    pub const fn new(stage: Stage, error: anyhow::Error) -> Self {
        Self { stage, error }
    }

    /// Returns the stage that failed.
    #[must_use]
    pub const fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Returns the error that stopped the stage.
    #[must_use]
    pub const fn error(&self) -> &anyhow::Error {
        &self.error
    }

    /// Consumes the failure, returning its error.
    #[must_use]
    pub fn into_error(self) -> anyhow::Error {
        self.error
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage '{}' failed: {:#}", self.stage, self.error)
    }
}

/// Result of [`BuildDriver::run`](driver::BuildDriver::run).
#[derive(Debug)]
pub enum BuildOutcome {
    Succeeded,
    Aborted(StageFailure),
}

impl BuildOutcome {
    /// Returns true when every stage completed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// True when every project built, even if the post-build hook then failed.
    #[must_use]
    pub fn build_succeeded(&self) -> bool {
        match self {
            Self::Succeeded => true,
            Self::Aborted(failure) => failure.stage == Stage::PostBuild,
        }
    }

    /// Returns the failure that aborted the run, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&StageFailure> {
        match self {
            Self::Succeeded => None,
            Self::Aborted(failure) => Some(failure),
        }
    }
}
