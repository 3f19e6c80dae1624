// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE      ← Additional config files (can repeat)
//! --dry              ← Locate tools, spawn nothing, write nothing
//! --log-level N      ← logging.level (0-6)
//! --file-log-level N ← logging.file_level (defaults to --log-level)
//! --log-file FILE    ← logging.log_file
//! --set KEY=VAL      ← Direct config override
//!
//! Precedence: CLI flags > --set > MSB__* env > --config > build.config.json
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional JSON/TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Disables auto loading of build.config.json, only uses --config.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,

    /// Locates tools and logs what would run, without spawning anything or
    /// touching version files.
    #[arg(long)]
    pub dry: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Sets an option, such as 'solution.path=App.sln' or 'process.timeout_secs=600'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", action = clap::ArgAction::Append)]
    pub options: Vec<String>,
}

/// Splits a `KEY=VALUE` option.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` when there is no `=` or the key is empty.
pub fn parse_override(option: &str) -> Result<(String, String), ConfigError> {
    match option.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidValue {
            section: "--set".to_string(),
            key: option.to_string(),
            message: "expected KEY=VALUE".to_string(),
        }),
    }
}

impl GlobalOptions {
    /// Converts command-line options to configuration overrides.
    ///
    /// `--set` entries come first so dedicated flags win over them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a malformed `--set` option.
    pub fn to_config_overrides(&self) -> Result<Vec<(String, String)>, ConfigError> {
        let mut overrides = self
            .options
            .iter()
            .map(|option| parse_override(option))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(level) = self.log_level {
            overrides.push(("logging.level".to_string(), level.to_string()));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(("logging.file_level".to_string(), level.to_string()));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(("logging.log_file".to_string(), path.display().to_string()));
        }

        Ok(overrides)
    }
}
