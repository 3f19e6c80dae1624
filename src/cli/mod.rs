// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for msb-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! msb [global options] [command]
//! build (default)  [--prebuild CMD] [--postbuild CMD] [--timeout SECS]
//! options
//! configs
//! version
//! ```

pub mod build;
pub mod global;


use crate::cli::build::BuildArgs;
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// MSBuild Orchestration Driver
///
/// Restores packages and builds the projects of one solution.
#[derive(Debug, Parser)]
#[command(
    name = "msb",
    author,
    version,
    about = "MSBuild Orchestration Driver",
    long_about = "msb-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Runs the prebuild hook, restores NuGet packages for the\n\
                  solution, builds every configured project in order with\n\
                  MSBuild and finally runs the postbuild hook. The first\n\
                  failing stage stops the run.",
    after_help = "CONFIGURATION:\n\n\
                  By default, msb loads `build.config.json` from the current\n\
                  directory if it exists. Additional files (.json or .toml) can be\n\
                  given with --config; later files override earlier ones. Use\n\
                  --no-default-config to only use --config. Environment variables\n\
                  named MSB__SECTION__KEY and --set SECTION.KEY=VALUE override\n\
                  values from files."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute, `build` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the command to run, defaulting to `build`.
    #[must_use]
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Build(BuildArgs::default()))
    }
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Runs the build pipeline.
    Build(BuildArgs),

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files used.
    Configs,

    /// Shows the version.
    Version,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
