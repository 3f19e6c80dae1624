// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for process and environment management.
//!
//! ```text
//!              core
//!               |
//!         +-----+-----+
//!         |           |
//!         v           v
//!        env       process
//!         |           |
//!   expand_vars   Builder
//!   $VAR %VAR%    Output
//!                 timeout / cancel
//! ```

pub mod env;
pub mod process;
