// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build command arguments.

use clap::Args;

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// Command line run before restoring packages; overrides hooks.prebuild.
    /// A non-zero exit code aborts the build.
    #[arg(long, value_name = "CMD")]
    pub prebuild: Option<String>,

    /// Command line run after the last project built; overrides hooks.postbuild.
    #[arg(long, value_name = "CMD")]
    pub postbuild: Option<String>,

    /// Kills any external process running longer than this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl BuildArgs {
    /// Converts build flags to configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(String, String)> {
        let mut overrides = Vec::new();
        if let Some(ref command) = self.prebuild {
            overrides.push(("hooks.prebuild".to_string(), command.clone()));
        }
        if let Some(ref command) = self.postbuild {
            overrides.push(("hooks.postbuild".to_string(), command.clone()));
        }
        if let Some(secs) = self.timeout {
            overrides.push(("process.timeout_secs".to_string(), secs.to_string()));
        }
        overrides
    }
}
