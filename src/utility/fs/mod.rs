// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem traversal and file lookup.
//!
//! ```text
//! walk:    walk_files()    ignore::Walk, files before dirs, sorted
//!          WalkOptions     hidden, gitignore
//! search:  PathSearcher    pinned file roots, then recursive name match
//!          find()          default searcher
//! containing_dir()         parent of a file, "." for a bare file name
//! ```

use std::path::Path;

pub mod search;
pub mod walk;

/// Returns the directory holding `file`.
///
/// `Path::parent` yields an empty path for a bare name like `App.sln`;
/// that case maps to the working directory.
#[must_use]
pub fn containing_dir(file: &Path) -> &Path {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
