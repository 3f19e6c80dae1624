// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Locating a named file under an ordered list of candidate roots.
//!
//! ```text
//! roots: ["%TOOLS%/nuget.exe", "C:/tools", "D:/sdk"]     target: "nuget.exe"
//!    |
//!    v  expand env vars
//!    |
//!    +--> pass 1: first root that IS a file  --> return it (name not checked)
//!    |
//!    +--> pass 2: walk each root in order    --> first file whose name
//!    |                                           matches, case-insensitive
//!    v
//!  None (normal outcome, callers decide)
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::walk::{WalkOptions, walk_files};
use crate::core::env::expand_vars;

/// Searches candidate roots for a file by name.
#[derive(Debug, Clone, Default)]
pub struct PathSearcher {
    options: WalkOptions,
}

impl PathSearcher {
    /// Creates a searcher with default walk options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds `target` under `roots`, expanding variables from the process environment.
    ///
    /// A root that points directly at an existing file wins outright, even
    /// if its name differs from `target`. Missing roots are skipped silently.
    #[must_use]
    pub fn find<S: AsRef<str>>(&self, roots: &[S], target: &str) -> Option<PathBuf> {
        self.find_with(roots, target, |name| std::env::var(name).ok())
    }

    /// Like [`find`](Self::find), with an explicit variable lookup.
    #[must_use]
    pub fn find_with<S, F>(&self, roots: &[S], target: &str, lookup: F) -> Option<PathBuf>
    where
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let expanded: Vec<PathBuf> = roots
            .iter()
            .map(|root| PathBuf::from(expand_vars(root.as_ref(), &lookup).into_owned()))
            .collect();

        if let Some(pinned) = expanded.iter().find(|root| root.is_file()) {
            debug!(target, path = %pinned.display(), "using pinned path");
            return Some(pinned.clone());
        }

        let found = expanded
            .iter()
            .find_map(|root| self.find_in_dir(root, target));
        if found.is_none() {
            debug!(target, roots = expanded.len(), "not found");
        }
        found
    }

    /// Walks a single directory for `target`; no variable expansion.
    #[must_use]
    pub fn find_in_dir(&self, dir: &Path, target: &str) -> Option<PathBuf> {
        if !dir.is_dir() {
            trace!(dir = %dir.display(), "skipping missing search root");
            return None;
        }

        let wanted = target.to_lowercase();
        let found = walk_files(dir, &self.options).find(|path| {
            path.file_name()
                .is_some_and(|name| name.to_string_lossy().to_lowercase() == wanted)
        });
        if let Some(path) = &found {
            debug!(target, path = %path.display(), "found");
        }
        found
    }
}

/// Finds `target` under `roots` with default options.
///
/// # Example
/// ```no_run
/// use msb_rs::utility::fs::search::find;
///
/// let msbuild = find(&["%ProgramFiles(x86)%/MSBuild"], "MSBuild.exe");
/// ```
#[must_use]
pub fn find<S: AsRef<str>>(roots: &[S], target: &str) -> Option<PathBuf> {
    PathSearcher::new().find(roots, target)
}
