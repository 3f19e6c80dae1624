// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands for msb-rs.

use crate::cli::build::BuildArgs;
use crate::cli::global::GlobalOptions;
use crate::config::types::LoggingConfig;
use crate::config::{Config, ConfigLoader, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::error::Result;
use crate::logging::{LogConfig, LogLevel};

/// Assembles the configuration sources for one invocation.
///
/// # Errors
///
/// Returns a `ConfigError::InvalidValue` for a malformed `--set` option.
pub fn build_config_loader(
    global: &GlobalOptions,
    build: Option<&BuildArgs>,
) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_file_optional(DEFAULT_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);

    let mut overrides = global.to_config_overrides()?;
    if let Some(build) = build {
        overrides.extend(build.to_config_overrides());
    }
    for (key, value) in overrides {
        loader = loader.set(&key, value)?;
    }
    Ok(loader)
}

/// Derives the logging setup from the `logging` section.
///
/// The file level falls back to the console level.
#[must_use]
pub fn log_config(logging: &LoggingConfig) -> LogConfig {
    let console_level = logging.level.unwrap_or(LogLevel::INFO);
    let file_level = logging.file_level.unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(logging.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

/// Display current configuration options.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Display loaded configuration files.
pub fn run_configs_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}
