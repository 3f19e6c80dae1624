// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment variable expansion for configured search roots.
//!
//! # Architecture
//!
//! ```text
//! "%ProgramFiles(x86)%/MSBuild"   "$HOME/tools"   "${TOOLS}/nuget.exe"
//!              |                        |                  |
//!              +------------+-----------+------------------+
//!                           v
//!            expand_vars(input, lookup)
//!              lookup(name) -> Some(value)  replace
//!              lookup(name) -> None         keep verbatim
//! ```
//!
//! - **Three syntaxes**: `$VAR`, `${VAR}` and `%VAR%`
//! - **Unknown variables stay verbatim**: a path with an unset variable
//!   simply fails to exist later instead of collapsing to an empty string
//! - **Pluggable lookup**: the caller supplies `lookup`

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;


static VAR_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)|%([^%\s]+)%").ok()
});

/// Expands variable references in `input` using `lookup`.
///
/// Returns the input unchanged (borrowed) when it contains no references.
pub fn expand_vars<F>(input: &str, lookup: F) -> Cow<'_, str>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(pattern) = VAR_PATTERN.as_ref() else {
        return Cow::Borrowed(input);
    };

    pattern.replace_all(input, |caps: &Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map_or("", |m| m.as_str());
        lookup(name).unwrap_or_else(|| caps[0].to_string())
    })
}
