// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for msb-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. build.config.json (cwd, optional)
//! 3. --config FILE (repeatable, .json or .toml)
//! 4. MSB__* env vars
//! 5. --set KEY=VALUE overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! MSB__SOLUTION__PATH=C:/src/App.sln   → solution.path
//! MSB__PROCESS__TIMEOUT_SECS=600       → process.timeout_secs
//! MSB__LOGGING__LEVEL=debug            → logging.level
//! ```
//!
//! The configuration is immutable once loaded; the driver shares it through
//! an `Arc`.

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

pub use loader::ConfigLoader;
use types::{
    BuildToolsConfig, HooksConfig, LoggingConfig, ProcessConfig, SolutionConfig, ToolConfig,
    UserDefinedConfig,
};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "build.config.json";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "MSB";

/// Complete build configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Solution and projects.
    pub solution: SolutionConfig,
    /// External tool search roots.
    pub build_tools: BuildToolsConfig,
    /// Opaque mapping handed to hooks.
    pub user_defined_config: UserDefinedConfig,
    /// Hook command lines.
    pub hooks: HooksConfig,
    /// Logging levels and file.
    pub logging: LoggingConfig,
    /// External process settings.
    pub process: ProcessConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use msb_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_file_optional("build.config.json")
    ///     .with_env_prefix("MSB")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or does not
    /// match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_file(path).build()
    }

    /// Load configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid JSON or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder()
            .add_str(content, config::FileFormat::Json)
            .build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::builder()
            .add_str(content, config::FileFormat::Toml)
            .build()
    }

    /// Returns the solution path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if `solution.path` is unset.
    pub fn solution_path(&self) -> std::result::Result<&Path, ConfigError> {
        self.solution
            .path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or_else(|| ConfigError::MissingKey {
                section: "solution".to_string(),
                key: "path".to_string(),
            })
    }

    /// Checks what a build needs before anything runs.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingKey` if `solution.path` is unset.
    /// - `ConfigError::InvalidValue` if a project has an empty name or path.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.solution_path()?;
        for (index, project) in self.solution.projects.iter().enumerate() {
            if project.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    section: "solution".to_string(),
                    key: format!("projects[{index}].name"),
                    message: "project name must not be empty".to_string(),
                });
            }
            if project.path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    section: "solution".to_string(),
                    key: format!("projects[{index}].path"),
                    message: format!("project '{}' has no path", project.name),
                });
            }
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Returns one aligned `key = value` line per option, ordered by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_solution_options(&mut options);
        Self::format_tool_options(&mut options, "msbuild", &self.build_tools.msbuild);
        Self::format_tool_options(&mut options, "nuget", &self.build_tools.nuget);
        self.format_misc_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_solution_options(&self, options: &mut BTreeMap<String, String>) {
        let fmt = |p: &Option<PathBuf>| {
            p.as_ref()
                .map_or_else(String::new, |p| p.display().to_string())
        };

        options.insert("solution.path".into(), fmt(&self.solution.path));
        for (index, project) in self.solution.projects.iter().enumerate() {
            let prefix = format!("solution.projects[{index}]");
            options.insert(format!("{prefix}.name"), project.name.clone());
            options.insert(format!("{prefix}.path"), project.path.display().to_string());
            let properties = project
                .build_properties
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(";");
            options.insert(format!("{prefix}.build_properties"), properties);
            options.insert(
                format!("{prefix}.versioning"),
                project
                    .versioning
                    .as_ref()
                    .map_or_else(String::new, ToString::to_string),
            );
        }
    }

    fn format_tool_options(options: &mut BTreeMap<String, String>, name: &str, tool: &ToolConfig) {
        options.insert(
            format!("build_tools.{name}.paths"),
            format!("[{}]", tool.paths.join(", ")),
        );
        if let Some(executable) = &tool.executable {
            options.insert(format!("build_tools.{name}.executable"), executable.clone());
        }
    }

    fn format_misc_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "user_defined_config".into(),
            self.user_defined_config.to_json_string(),
        );
        options.insert(
            "hooks.prebuild".into(),
            self.hooks.prebuild.clone().unwrap_or_default(),
        );
        options.insert(
            "hooks.postbuild".into(),
            self.hooks.postbuild.clone().unwrap_or_default(),
        );
        options.insert(
            "logging.level".into(),
            self.logging
                .level
                .map_or_else(String::new, |level| level.to_string()),
        );
        options.insert(
            "logging.file_level".into(),
            self.logging
                .file_level
                .map_or_else(String::new, |level| level.to_string()),
        );
        options.insert(
            "logging.log_file".into(),
            self.logging
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert(
            "process.timeout_secs".into(),
            self.process
                .timeout_secs
                .map_or_else(String::new, |secs| secs.to_string()),
        );
    }
}
