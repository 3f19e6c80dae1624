// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> ConfigLoader --> Logging --> Command Dispatch
//!   Build | Options | Configs | Version
//! ```

use std::process::ExitCode;

use msb_rs::cli::{self, Command};
use msb_rs::cmd::build::run_build_command;
use msb_rs::cmd::config::{
    build_config_loader, log_config, run_configs_command, run_options_command,
};
use msb_rs::config::types::LoggingConfig;
use msb_rs::logging::init_logging;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();
    let command = cli.command_or_default();

    if matches!(command, Command::Version) {
        handle_version_command();
        return ExitCode::SUCCESS;
    }

    let build_args = match &command {
        Command::Build(args) => Some(args),
        _ => None,
    };
    let loader = match build_config_loader(&cli.global, build_args) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let config_files = loader.format_loaded_files();
    let has_sources = loader.has_sources();

    // A broken configuration still gets default logging so the failure is reported.
    let config = loader.build();
    let logging = config
        .as_ref()
        .map_or_else(|_| LoggingConfig::default(), |c| c.logging.clone());
    let _log_guard = match init_logging(&log_config(&logging)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = match command {
        Command::Configs => {
            run_configs_command(&config_files);
            Ok(())
        }
        Command::Options => config.map(|config| run_options_command(&config)),
        Command::Build(_) => match config {
            Ok(config) => run_build_command(config, has_sources, cli.global.dry).await,
            Err(e) => Err(e),
        },
        Command::Version => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}
