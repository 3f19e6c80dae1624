// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use super::{NUGET_EXE, NugetTool, PACKAGES_CONFIG};
use crate::config::Config;
use crate::config::types::ToolConfig;
use crate::error::{FsError, ProcessError};
use crate::pipeline::ToolContext;
use crate::pipeline::tools::Fetcher;
use crate::pipeline::tools::test_utils::{capture_logs, recorded_calls};

fn ctx(dry_run: bool) -> ToolContext {
    ToolContext::new(Arc::new(Config::default()), CancellationToken::new(), dry_run)
}

/// Creates `<temp>/sln/App.sln`, optionally with a nested `packages.config`.
fn solution(temp: &TempDir, with_sentinel: bool) -> PathBuf {
    let dir = temp.path().join("sln");
    std::fs::create_dir_all(dir.join("App")).unwrap();
    let sln = dir.join("App.sln");
    std::fs::write(&sln, "").unwrap();
    if with_sentinel {
        std::fs::write(dir.join("App").join(PACKAGES_CONFIG), "<packages/>").unwrap();
    }
    sln
}

fn tools_dir(temp: &TempDir) -> PathBuf {
    let dir = temp.path().join("tools");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_from_config_executable_override() {
    let config = ToolConfig {
        paths: vec!["C:/tools".into()],
        executable: Some("nuget.cmd".into()),
    };
    let tool = NugetTool::from_config(&config);
    assert_eq!(tool.executable(), "nuget.cmd");
    assert_eq!(tool.roots(), ["C:/tools"]);

    let tool = NugetTool::from_config(&ToolConfig::default());
    assert_eq!(tool.executable(), NUGET_EXE);
    assert_eq!(tool.name(), "nuget");
}

#[test]
fn test_find_sentinel_nested() {
    let temp = TempDir::new().unwrap();
    let sln = solution(&temp, true);
    let sentinel = NugetTool::new(Vec::<String>::new())
        .find_sentinel(&sln)
        .unwrap();
    assert!(sentinel.is_some_and(|p| p.ends_with(Path::new("App").join(PACKAGES_CONFIG))));
}

#[test]
fn test_locate_empty_roots() {
    let err = NugetTool::new(Vec::<String>::new()).locate().unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"executable not found: 'nuget.exe' (searched: no paths configured)"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_fetch_missing_solution() {
    let temp = TempDir::new().unwrap();
    let tool = NugetTool::new([temp.path().display().to_string()]);
    let ctx = ctx(false);
    let missing = temp.path().join("Nope.sln");

    let (result, logs) = capture_logs(|| tool.fetch(&ctx, &missing)).await;
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FsError>(),
        Some(FsError::NotFound(_))
    ));
    assert!(logs.contains("solution file not found"));
}

#[tokio::test(flavor = "current_thread")]
async fn test_fetch_without_sentinel_spawns_nothing() {
    let temp = TempDir::new().unwrap();
    let sln = solution(&temp, false);
    // No roots at all: locating would fail if it were attempted.
    let tool = NugetTool::new(Vec::<String>::new());
    let ctx = ctx(false);

    let (result, logs) = capture_logs(|| tool.fetch(&ctx, &sln)).await;
    assert!(result.is_ok());
    assert!(logs.contains("nothing to restore"));
}

#[tokio::test(flavor = "current_thread")]
async fn test_fetch_tool_absent() {
    let temp = TempDir::new().unwrap();
    let sln = solution(&temp, true);
    let tools = tools_dir(&temp);
    let tool = NugetTool::new([tools.display().to_string()]);
    let ctx = ctx(false);

    let (result, _) = capture_logs(|| tool.fetch(&ctx, &sln)).await;
    let err = result.unwrap_err();
    match err.downcast_ref::<ProcessError>() {
        Some(ProcessError::ExecutableNotFound { name, roots }) => {
            assert_eq!(name, NUGET_EXE);
            assert_eq!(roots.len(), 1);
        }
        other => panic!("expected ExecutableNotFound, got {other:?}"),
    }
}

#[cfg(unix)]
mod unix {
    use super::*;
    use crate::pipeline::tools::test_utils::fake_tool;

    #[tokio::test(flavor = "current_thread")]
    async fn test_fetch_runs_restore() {
        let temp = TempDir::new().unwrap();
        let sln = solution(&temp, true);
        let tools = tools_dir(&temp);
        fake_tool(&tools, NUGET_EXE, 0);
        let tool = NugetTool::new([tools.display().to_string()]);
        let ctx = ctx(false);

        let (result, logs) = capture_logs(|| tool.fetch(&ctx, &sln)).await;
        result.unwrap();
        assert_eq!(
            recorded_calls(&tools, NUGET_EXE),
            vec![format!("restore {}", sln.display())]
        );
        assert!(logs.contains("NuGet restore completed successfully"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_fetch_pinned_tool_path() {
        let temp = TempDir::new().unwrap();
        let sln = solution(&temp, true);
        let tools = tools_dir(&temp);
        let pinned = fake_tool(&tools, "restore-tool", 0);
        let tool = NugetTool::new(["/definitely/not/here".to_string(), pinned.display().to_string()]);
        let ctx = ctx(false);

        let (result, _) = capture_logs(|| tool.fetch(&ctx, &sln)).await;
        result.unwrap();
        assert_eq!(recorded_calls(&tools, "restore-tool").len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_fetch_failure_carries_output() {
        let temp = TempDir::new().unwrap();
        let sln = solution(&temp, true);
        let tools = tools_dir(&temp);
        fake_tool(&tools, NUGET_EXE, 3);
        let tool = NugetTool::new([tools.display().to_string()]);
        let ctx = ctx(false);

        let (result, _) = capture_logs(|| tool.fetch(&ctx, &sln)).await;
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("Failed to restore packages for"));
        match err.downcast_ref::<ProcessError>() {
            Some(ProcessError::NonZeroExit { code, stdout, .. }) => {
                assert_eq!(*code, 3);
                assert!(stdout.contains("nuget.exe ran"));
            }
            other => panic!("expected NonZeroExit, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_fetch_dry_run() {
        let temp = TempDir::new().unwrap();
        let sln = solution(&temp, true);
        let tools = tools_dir(&temp);
        fake_tool(&tools, NUGET_EXE, 0);
        let tool = NugetTool::new([tools.display().to_string()]);
        let ctx = ctx(true);

        let (result, logs) = capture_logs(|| tool.fetch(&ctx, &sln)).await;
        result.unwrap();
        assert!(
            logs.contains("[dry-run] Would restore packages with NuGet"),
            "log output should include dry-run message: {logs}"
        );
        assert!(recorded_calls(&tools, NUGET_EXE).is_empty());
    }
}
