// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |            build / options
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  JSON/TOML, env, --set    |
//!              '-------------+-------------'
//!                            v
//!                        pipeline
//!          driver: prehook -> fetch -> build xN -> posthook
//!                            |
//!                 +----------+----------+
//!                 v          v          v
//!               hooks      nuget     msbuild --> versioning
//!
//!   +-----------------------------------------+
//!   |  core   process, env expansion          |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod utility;
pub mod versioning;
