// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for msb-rs.
//!
//! # Config Structure
//!
//! ```text
//! Config
//!   solution:            SolutionConfig   { path, projects: [ProjectSpec] }
//!   build_tools:         BuildToolsConfig { msbuild: ToolConfig, nuget: ToolConfig }
//!   user_defined_config: UserDefinedConfig (opaque JSON, handed to hooks)
//!   hooks:               HooksConfig      { prebuild, postbuild }
//!   logging:             LoggingConfig    { level, file_level, log_file }
//!   process:             ProcessConfig    { timeout_secs }
//! ```
//!
//! # Project Entries
//!
//! ```text
//! { "project": { "name": .., "path": .. } }   wrapped (legacy layout)
//! { "name": .., "path": .. }                  bare
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::logging::LogLevel;
use crate::utility::fs::containing_dir;
use crate::versioning::VersioningSpec;

/// Solution section: the solution file and its projects in build order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolutionConfig {
    /// Path to the `.sln` file.
    pub path: Option<PathBuf>,
    /// Projects, built in exactly this order.
    pub projects: Vec<ProjectSpec>,
}

/// One project to compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProjectEntry")]
pub struct ProjectSpec {
    /// Display name used in logs and stage names.
    pub name: String,
    /// Path to the project descriptor (e.g. `.csproj`).
    pub path: PathBuf,
    /// MSBuild properties, rendered as `/property:k1=v1;k2=v2`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub build_properties: BTreeMap<String, String>,
    /// Optional version stamping template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versioning: Option<VersioningSpec>,
}

impl ProjectSpec {
    /// Creates a project without properties or versioning.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            build_properties: BTreeMap::new(),
            versioning: None,
        }
    }

    /// Adds a build property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.build_properties.insert(key.into(), value.into());
        self
    }

    /// Sets the versioning template.
    #[must_use]
    pub fn with_versioning(mut self, spec: VersioningSpec) -> Self {
        self.versioning = Some(spec);
        self
    }

    /// Returns the directory containing the project file.
    #[must_use]
    pub fn directory(&self) -> &Path {
        containing_dir(&self.path)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectFields {
    name: String,
    path: PathBuf,
    #[serde(default)]
    build_properties: BTreeMap<String, String>,
    #[serde(default)]
    versioning: Option<VersioningSpec>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectEntry {
    Wrapped { project: ProjectFields },
    Bare(ProjectFields),
}

impl From<ProjectEntry> for ProjectSpec {
    fn from(entry: ProjectEntry) -> Self {
        let (ProjectEntry::Wrapped { project: fields } | ProjectEntry::Bare(fields)) = entry;
        Self {
            name: fields.name,
            path: fields.path,
            build_properties: fields.build_properties,
            versioning: fields.versioning,
        }
    }
}

/// Search configuration for one external tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Search roots: direct file paths or directories, env vars allowed.
    pub paths: Vec<String>,
    /// Executable name to look for, overriding the tool's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,
}

impl ToolConfig {
    /// Creates a tool config with the given search roots.
    pub fn with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            executable: None,
        }
    }

    /// Returns the configured executable name or `default`.
    #[must_use]
    pub fn executable_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.executable.as_deref().unwrap_or(default)
    }
}

/// External build tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildToolsConfig {
    /// The compiler driver.
    pub msbuild: ToolConfig,
    /// The package restore tool.
    pub nuget: ToolConfig,
}

/// Opaque user mapping handed verbatim to hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDefinedConfig(serde_json::Value);

impl Default for UserDefinedConfig {
    fn default() -> Self {
        Self(serde_json::Value::Object(serde_json::Map::new()))
    }
}

impl UserDefinedConfig {
    /// Wraps a JSON value.
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Looks up a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Serializes to compact JSON.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }
}

/// Hook command lines run through the platform shell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HooksConfig {
    /// Runs before dependency restore.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prebuild: Option<String>,
    /// Runs after the last project built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postbuild: Option<String>,
}

/// Logging section.
///
/// Unknown keys are ignored so configuration files written for other
/// logging setups still load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Console level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    /// Log file level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_level: Option<LogLevel>,
    /// Log file path; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// External process settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessConfig {
    /// Per-process time limit in seconds; unlimited when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ProcessConfig {
    /// Returns the per-process timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
