// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::test_utils::{capture_logs, run_with_logs};
use super::{Fetcher, ProjectBuilder};
use crate::config::Config;
use crate::config::types::ProjectSpec;
use crate::error::Result;
use crate::pipeline::ToolContext;
use futures_util::future::BoxFuture;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

struct EchoTool;

impl Fetcher for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn fetch<'a>(&'a self, _ctx: &'a ToolContext, solution: &'a Path) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            tracing::info!(solution = %solution.display(), "fetching");
            Ok(())
        })
    }
}

impl ProjectBuilder for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn build_project<'a>(
        &'a self,
        _ctx: &'a ToolContext,
        project: &'a ProjectSpec,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move { anyhow::bail!("cannot build {}", project.name) })
    }
}

fn ctx() -> ToolContext {
    ToolContext::new(Arc::new(Config::default()), CancellationToken::new(), false)
}

#[tokio::test(flavor = "current_thread")]
async fn test_fetcher_trait_object() {
    let fetcher: Box<dyn Fetcher> = Box::new(EchoTool);
    let ctx = ctx();

    let logs = run_with_logs(|| fetcher.fetch(&ctx, Path::new("App.sln")))
        .await
        .unwrap();
    assert_eq!(fetcher.name(), "echo");
    assert!(logs.contains("fetching"));
    assert!(logs.contains("solution=App.sln"));
}

#[tokio::test(flavor = "current_thread")]
async fn test_builder_trait_object_error() {
    let builder: Box<dyn ProjectBuilder> = Box::new(EchoTool);
    let ctx = ctx();
    let project = ProjectSpec::new("App", "App.csproj");

    let (result, _) = capture_logs(|| builder.build_project(&ctx, &project)).await;
    assert_eq!(result.unwrap_err().to_string(), "cannot build App");
}
