// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end pipeline tests.
//!
//! Stand-in `nuget.exe` / `MSBuild.exe` shell scripts record every
//! invocation to a shared log, so the tests run on Unix only.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use msb_rs::cmd::build::run_build;
use msb_rs::config::Config;
use msb_rs::config::types::{ProjectSpec, ToolConfig};
use msb_rs::error::{ConfigError, MsbError};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const VERSION_FILE: &str = "using System.Reflection;\n\
[assembly: AssemblyVersion(\"1.2.3.4\")]\n\
[assembly: AssemblyFileVersion(\"1.2.3.4\")]\n";

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    /// Solution with projects A, B, C; A carries versioning and a packages.config.
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for name in ["A", "B", "C"] {
            let dir = root.join("sln").join(name);
            std::fs::create_dir_all(dir.join("Properties")).unwrap();
            std::fs::write(dir.join(format!("{name}.csproj")), "<Project/>").unwrap();
        }
        std::fs::write(root.join("sln/App.sln"), "").unwrap();
        std::fs::write(root.join("sln/A/packages.config"), "<packages/>").unwrap();
        std::fs::write(root.join("sln/A/Properties/AssemblyInfo.cs"), VERSION_FILE).unwrap();

        std::fs::create_dir_all(root.join("tools/bin")).unwrap();
        let ws = Self { temp };
        ws.tool("nuget.exe", "exit 0");
        ws.tool("MSBuild.exe", "exit 0");
        ws
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn calls_log(&self) -> PathBuf {
        self.root().join("calls.log")
    }

    fn tool(&self, name: &str, body: &str) {
        let path = self.root().join("tools/bin").join(name);
        let script = format!(
            "#!/bin/sh\necho \"{name} $*\" >> '{}'\n{body}\n",
            self.calls_log().display()
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Program names of every recorded invocation, in order.
    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.calls_log())
            .unwrap_or_default()
            .lines()
            .map(|line| {
                let mut parts = line.split_whitespace();
                let program = parts.next().unwrap_or_default();
                match parts.next() {
                    Some(first) if program == "MSBuild.exe" => Path::new(first)
                        .file_stem()
                        .map(|s| format!("msbuild {}", s.to_string_lossy()))
                        .unwrap_or_default(),
                    Some(first) => format!("nuget {first}"),
                    None => program.to_string(),
                }
            })
            .collect()
    }

    fn assembly_info(&self) -> String {
        std::fs::read_to_string(self.root().join("sln/A/Properties/AssemblyInfo.cs")).unwrap()
    }

    fn config(&self) -> Config {
        let root = self.root();
        let mut config = Config::default();
        config.solution.path = Some(root.join("sln/App.sln"));
        config.solution.projects = ["A", "B", "C"]
            .into_iter()
            .map(|name| {
                ProjectSpec::new(name, root.join(format!("sln/{name}/{name}.csproj")))
                    .with_property("Configuration", "Release")
            })
            .collect();
        config.solution.projects[0].versioning = Some("+.+.+.0".parse().unwrap());
        // Directory roots are walked; the direct file path wins for MSBuild.
        config.build_tools.nuget = ToolConfig::with_paths([root.join("tools").display().to_string()]);
        config.build_tools.msbuild = ToolConfig::with_paths([
            root.join("missing").display().to_string(),
            root.join("tools/bin/MSBuild.exe").display().to_string(),
        ]);
        config
    }
}

async fn run(config: Config, dry_run: bool) -> anyhow::Result<()> {
    run_build(config, true, dry_run, CancellationToken::new()).await
}

fn bailed_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<MsbError>() {
        Some(MsbError::Bailed(message)) => message.to_string(),
        other => panic!("expected a bailed build, got {other:?}"),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn build_runs_every_stage_in_order() {
    let ws = Workspace::new();

    run(ws.config(), false).await.unwrap();

    assert_eq!(
        ws.calls(),
        vec!["nuget restore", "msbuild A", "msbuild B", "msbuild C"]
    );
    let info = ws.assembly_info();
    assert!(info.contains("[assembly: AssemblyVersion(\"2.3.4.4\")]"));
    assert!(info.contains("[assembly: AssemblyFileVersion(\"2.3.4.4\")]"));
    assert!(info.starts_with("using System.Reflection;\n"));

    let log = std::fs::read_to_string(ws.calls_log()).unwrap();
    assert!(log.contains("/target:Build /property:Configuration=Release"));
}

#[tokio::test(flavor = "current_thread")]
async fn build_failure_stops_later_projects() {
    let ws = Workspace::new();
    ws.tool("MSBuild.exe", "case \"$1\" in *B.csproj) exit 1;; esac\nexit 0");

    let err = run(ws.config(), false).await.unwrap_err();

    let message = bailed_message(&err);
    assert!(message.starts_with("build aborted: stage 'build B' failed: "), "{message}");
    assert!(message.contains("exited with code 1"), "{message}");
    assert_eq!(ws.calls(), vec!["nuget restore", "msbuild A", "msbuild B"]);
}

#[tokio::test(flavor = "current_thread")]
async fn fetch_failure_builds_nothing() {
    let ws = Workspace::new();
    ws.tool("nuget.exe", "exit 2");

    let err = run(ws.config(), false).await.unwrap_err();

    assert!(bailed_message(&err).starts_with("build aborted: stage 'fetch' failed: "));
    assert_eq!(ws.calls(), vec!["nuget restore"]);
    assert_eq!(ws.assembly_info(), VERSION_FILE);
}

#[tokio::test(flavor = "current_thread")]
async fn missing_restore_tool_spawns_nothing() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.build_tools.nuget = ToolConfig::with_paths([ws.root().join("missing").display().to_string()]);

    let err = run(config, false).await.unwrap_err();

    assert!(bailed_message(&err).starts_with("build aborted: stage 'fetch' failed: "));
    assert!(ws.calls().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn no_sentinel_skips_restore() {
    let ws = Workspace::new();
    std::fs::remove_file(ws.root().join("sln/A/packages.config")).unwrap();
    let mut config = ws.config();
    config.build_tools.nuget = ToolConfig::default();

    run(config, false).await.unwrap();

    assert_eq!(ws.calls(), vec!["msbuild A", "msbuild B", "msbuild C"]);
}

#[tokio::test(flavor = "current_thread")]
async fn missing_project_file_aborts_that_stage() {
    let ws = Workspace::new();
    std::fs::remove_file(ws.root().join("sln/B/B.csproj")).unwrap();

    let err = run(ws.config(), false).await.unwrap_err();

    assert!(bailed_message(&err).starts_with("build aborted: stage 'build B' failed: "));
    assert_eq!(ws.calls(), vec!["nuget restore", "msbuild A"]);
}

#[tokio::test(flavor = "current_thread")]
async fn dry_run_spawns_and_writes_nothing() {
    let ws = Workspace::new();

    run(ws.config(), true).await.unwrap();

    assert!(ws.calls().is_empty());
    assert_eq!(ws.assembly_info(), VERSION_FILE);
}

#[tokio::test(flavor = "current_thread")]
async fn prebuild_hook_rejection_aborts() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.hooks.prebuild = Some("exit 1".to_string());

    let err = run(config, false).await.unwrap_err();

    assert!(bailed_message(&err).starts_with("build aborted: stage 'prebuild' failed: "));
    assert!(ws.calls().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn postbuild_hook_receives_user_config() {
    let ws = Workspace::new();
    let marker = ws.root().join("marker.json");
    let mut config = ws.config();
    config.user_defined_config = msb_rs::config::types::UserDefinedConfig::new(
        serde_json::json!({ "channel": "nightly" }),
    );
    config.hooks.postbuild = Some(format!(
        "printf '%s' \"$MSB_USER_CONFIG\" > '{}'",
        marker.display()
    ));

    run(config, false).await.unwrap();

    assert_eq!(
        std::fs::read_to_string(marker).unwrap(),
        r#"{"channel":"nightly"}"#
    );
}

#[tokio::test(flavor = "current_thread")]
async fn postbuild_failure_after_successful_build() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.hooks.postbuild = Some("exit 3".to_string());

    let err = run(config, false).await.unwrap_err();

    assert!(
        bailed_message(&err).starts_with("all projects built, but stage 'postbuild' failed: ")
    );
    assert_eq!(ws.calls().len(), 4);
}

#[tokio::test(flavor = "current_thread")]
async fn missing_configuration_is_reported() {
    let err = run_build(Config::default(), false, false, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::NotFound(name)) if name == "build.config.json"
    ));

    let err = run(Config::default(), false).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingKey { .. })
    ));
}
