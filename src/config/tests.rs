// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::types::{ProjectSpec, ToolConfig, UserDefinedConfig};
use super::{Config, ConfigLoader};
use crate::error::ConfigError;
use crate::logging::LogLevel;
use std::path::Path;

const SAMPLE: &str = r#"{
    "solution": {
        "path": "C:/src/App/App.sln",
        "projects": [
            {
                "project": {
                    "name": "Core",
                    "path": "C:/src/App/Core/Core.csproj",
                    "build_properties": { "configuration": "release", "platform": "x64" },
                    "versioning": "+.+.+.0"
                }
            },
            { "name": "App", "path": "C:/src/App/App/App.csproj" }
        ]
    },
    "build_tools": {
        "msbuild": { "paths": ["%ProgramFiles(x86)%/MSBuild"] },
        "nuget": { "paths": ["C:/tools/nuget.exe"], "executable": "nuget.cmd" }
    },
    "user_defined_config": { "my_fancy_object": { "answer": 42 } },
    "logging": { "level": "debug", "file_level": 5, "log_file": "build.log" },
    "process": { "timeout_secs": 600 }
}"#;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert!(config.solution.path.is_none());
    assert!(config.solution.projects.is_empty());
    assert_eq!(config.user_defined_config, UserDefinedConfig::default());
    assert!(config.process.timeout().is_none());
}

#[test]
fn test_config_parse_json() {
    let config = Config::parse(SAMPLE).unwrap();

    assert_eq!(
        config.solution.path.as_deref(),
        Some(Path::new("C:/src/App/App.sln"))
    );
    let names: Vec<_> = config
        .solution
        .projects
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Core", "App"]);

    let core = &config.solution.projects[0];
    assert_eq!(core.build_properties.len(), 2);
    assert_eq!(
        core.versioning.as_ref().map(ToString::to_string).as_deref(),
        Some("+.+.+.0")
    );
    assert!(config.solution.projects[1].versioning.is_none());

    assert_eq!(
        config.build_tools.nuget.executable_or("nuget.exe"),
        "nuget.cmd"
    );
    assert_eq!(
        config.build_tools.msbuild.executable_or("MSBuild.exe"),
        "MSBuild.exe"
    );
    assert_eq!(
        config
            .user_defined_config
            .get("my_fancy_object")
            .and_then(|v| v.get("answer"))
            .and_then(serde_json::Value::as_i64),
        Some(42)
    );
    assert_eq!(config.logging.level, Some(LogLevel::DEBUG));
    assert_eq!(config.logging.file_level, Some(LogLevel::TRACE));
    assert_eq!(config.process.timeout_secs, Some(600));
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_parse_toml() {
    let toml = r#"
[solution]
path = "App.sln"

[[solution.projects]]
name = "App"
path = "App/App.csproj"
versioning = "0.0.+.0"

[build_tools.msbuild]
paths = ["/opt/msbuild"]
"#;

    let config = Config::parse_toml(toml).unwrap();
    assert_eq!(config.solution.projects.len(), 1);
    assert_eq!(config.build_tools.msbuild.paths, vec!["/opt/msbuild"]);
    assert!(config.build_tools.nuget.paths.is_empty());
}

#[test]
fn test_invalid_versioning_rejected() {
    let json = r#"{ "solution": { "path": "a.sln",
        "projects": [ { "name": "A", "path": "a.csproj", "versioning": "x.+" } ] } }"#;
    assert!(Config::parse(json).is_err());
}

#[test]
fn test_unknown_top_level_key_rejected() {
    let err = Config::parse(r#"{ "soluton": {} }"#).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::ParseError { .. })
    ));
}

#[test]
fn test_logging_section_tolerates_foreign_keys() {
    let json = r#"{ "logging": { "version": 1, "handlers": {}, "level": 2 } }"#;
    let config = Config::parse(json).unwrap();
    assert_eq!(config.logging.level, Some(LogLevel::WARN));
}

#[test]
fn test_validate_requires_solution_path() {
    let err = Config::default().validate().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"missing required config key 'path' in section '[solution]'");
}

#[test]
fn test_validate_rejects_empty_project_name() {
    let mut config = Config::default();
    config.solution.path = Some("App.sln".into());
    config
        .solution
        .projects
        .push(ProjectSpec::new("  ", "App.csproj"));

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_loader_override_and_files() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("build.config.json");
    std::fs::write(&file, SAMPLE).unwrap();

    let loader = ConfigLoader::new()
        .add_file_optional(temp.path().join("missing.json"))
        .add_file(&file)
        .set("solution.path", "D:/other/Other.sln")
        .unwrap();

    assert!(loader.has_sources());
    assert_eq!(loader.loaded_files().len(), 1);
    assert!(loader.format_loaded_files()[0].starts_with("1. [file] "));

    let config = loader.build().unwrap();
    assert_eq!(
        config.solution.path.as_deref(),
        Some(Path::new("D:/other/Other.sln"))
    );
}

#[test]
fn test_loader_without_sources_yields_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let loader = ConfigLoader::new().add_file_optional(temp.path().join("build.config.json"));

    assert!(!loader.has_sources());
    let config = loader.build().unwrap();
    assert!(config.solution.path.is_none());
}

#[test]
fn test_loader_required_file_missing() {
    let temp = tempfile::tempdir().unwrap();
    let result = ConfigLoader::new()
        .add_file(temp.path().join("nope.json"))
        .build();
    assert!(result.is_err());
}

#[test]
fn test_format_options() {
    let mut config = Config::default();
    config.solution.path = Some("App.sln".into());
    config.solution.projects.push(
        ProjectSpec::new("App", "App.csproj")
            .with_property("Configuration", "Release")
            .with_property("Platform", "AnyCPU"),
    );
    config.build_tools.nuget = ToolConfig::with_paths(["C:/tools"]);

    let lines = config.format_options();
    assert!(lines.iter().any(|l| l.starts_with("solution.path") && l.ends_with("= App.sln")));
    assert!(lines.iter().any(|l| {
        l.starts_with("solution.projects[0].build_properties")
            && l.ends_with("= Configuration=Release;Platform=AnyCPU")
    }));
    assert!(lines.iter().any(|l| l.ends_with("= [C:/tools]")));

    // Keys are aligned on '='
    let columns: Vec<_> = lines.iter().filter_map(|l| l.find(" = ")).collect();
    assert!(columns.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_bare_project_path_lives_in_working_directory() {
    let project = ProjectSpec::new("App", "Cargo.toml");
    assert_eq!(project.directory(), Path::new("."));

    // Tests run from the crate root, next to Cargo.toml.
    let found = crate::utility::fs::search::PathSearcher::new()
        .find_in_dir(project.directory(), "Cargo.toml");
    assert!(found.is_some());
}
