// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use bon::Builder;
use ignore::WalkBuilder;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Options for deterministic directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// Include hidden files/directories
    #[builder(setters(name = with_include_hidden), default = true)]
    include_hidden: bool,
    /// Respect .gitignore files
    #[builder(setters(name = with_respect_gitignore), default = false)]
    respect_gitignore: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    /// Returns whether to include hidden files/directories.
    #[must_use]
    pub const fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Returns whether to respect .gitignore files.
    #[must_use]
    pub const fn respect_gitignore(&self) -> bool {
        self.respect_gitignore
    }
}

/// Orders siblings: files first, then directories, each group by name.
fn files_then_dirs(a: &Path, b: &Path) -> Ordering {
    a.is_dir()
        .cmp(&b.is_dir())
        .then_with(|| a.file_name().cmp(&b.file_name()))
}

/// Builds a sequential `WalkBuilder` with the given options.
pub(super) fn build_walker(root: &Path, options: &WalkOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    builder.hidden(!options.include_hidden());

    builder.git_ignore(options.respect_gitignore());
    builder.git_global(options.respect_gitignore());
    builder.git_exclude(options.respect_gitignore());
    builder.ignore(options.respect_gitignore());
    builder.parents(options.respect_gitignore());

    builder.sort_by_file_path(files_then_dirs);

    builder
}

/// Walks `root` depth-first and yields every regular file.
///
/// Within a directory, files are visited before subdirectories and both are
/// sorted by name, so repeated walks of an unchanged tree yield the same
/// sequence. Unreadable entries are logged and skipped.
///
/// # Example
/// ```no_run
/// use msb_rs::utility::fs::walk::{walk_files, WalkOptions};
///
/// for file in walk_files("C:/src/App", &WalkOptions::default()) {
///     println!("{}", file.display());
/// }
/// ```
pub fn walk_files<P: AsRef<Path>>(
    root: P,
    options: &WalkOptions,
) -> impl Iterator<Item = PathBuf> {
    build_walker(root.as_ref(), options)
        .build()
        .filter_map(|entry_result| match entry_result {
            Ok(entry) if entry.file_type().is_some_and(|ft| ft.is_file()) => {
                Some(entry.into_path())
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "walk error");
                None
            }
        })
}
