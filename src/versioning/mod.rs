// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Assembly version stamping.
//!
//! Rewrites the `AssemblyVersion` and `AssemblyFileVersion` declarations of a
//! C# source file (usually `AssemblyInfo.cs`) according to a dotted template.
//!
//! ```text
//! template "+.+.+.0"          file line
//!    |                        [assembly: AssemblyVersion("1.2.3.4")]
//!    v                                   |
//! [Inc, Inc, Inc, Lit(0)]                v
//!    |                            old = "1.2.3.4"
//!    +---------> increment_version <-----+
//!                      |
//!                      v
//!              new = "2.3.4.4"      (literal fields keep the on-disk value)
//!                      |
//!                      v
//!         [assembly: AssemblyVersion("2.3.4.4")]   line ending preserved
//! ```
//!
//! [`stamp_content`] performs the rewrite in memory; [`increment`] wraps it
//! with file I/O. A template without any `+` is a no-op and the file is
//! never touched. The write is not atomic.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::error::{FsError, Result, VersioningError};


/// Declaration patterns, tried in this order on every line.
static DECLARATIONS: LazyLock<Vec<(DeclarationKind, Regex)>> = LazyLock::new(|| {
    [
        DeclarationKind::AssemblyVersion,
        DeclarationKind::AssemblyFileVersion,
    ]
    .into_iter()
    .filter_map(|kind| {
        let pattern = format!(
            r#"\[assembly:\s*{}\s*\(\s*"(\d+(?:\.\d+){{0,3}})"\s*\)\s*\]"#,
            kind.attribute()
        );
        Regex::new(&pattern).ok().map(|regex| (kind, regex))
    })
    .collect()
});

/// One field of a versioning template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionField {
    /// `+`: increment the on-disk value by one.
    Increment,
    /// A literal integer.
    Literal(u64),
}

/// Parsed dotted versioning template, e.g. `"+.+.+.0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersioningSpec {
    raw: String,
    fields: Vec<VersionField>,
}

impl VersioningSpec {
    /// Returns the template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed fields.
    #[must_use]
    pub fn fields(&self) -> &[VersionField] {
        &self.fields
    }

    /// Returns true if any field is the `+` placeholder.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.fields.contains(&VersionField::Increment)
    }
}

impl FromStr for VersioningSpec {
    type Err = VersioningError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = |message: String| VersioningError::InvalidSpec {
            spec: s.to_string(),
            message,
        };

        if s.trim().is_empty() {
            return Err(invalid("template is empty".to_string()));
        }

        let fields = s
            .split('.')
            .enumerate()
            .map(|(index, field)| match field.trim() {
                "+" => Ok(VersionField::Increment),
                literal => literal.parse().map(VersionField::Literal).map_err(|_| {
                    invalid(format!(
                        "field {index} ('{literal}') is neither '+' nor an integer"
                    ))
                }),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: s.to_string(),
            fields,
        })
    }
}

impl TryFrom<String> for VersioningSpec {
    type Error = VersioningError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for VersioningSpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for VersioningSpec {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for VersioningSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Which assembly attribute a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclarationKind {
    AssemblyVersion,
    AssemblyFileVersion,
}

impl DeclarationKind {
    /// Returns the C# attribute name.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::AssemblyVersion => "AssemblyVersion",
            Self::AssemblyFileVersion => "AssemblyFileVersion",
        }
    }

    /// Renders the full declaration for `version`, without line ending.
    #[must_use]
    pub fn render(self, version: &str) -> String {
        format!("[assembly: {}(\"{version}\")]", self.attribute())
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// A single rewritten declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionChange {
    kind: DeclarationKind,
    line: usize,
    old: String,
    new: String,
}

impl VersionChange {
    /// Returns the attribute that changed.
    #[must_use]
    pub const fn kind(&self) -> DeclarationKind {
        self.kind
    }

    /// Returns the 1-based line number.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the version before stamping.
    #[must_use]
    pub fn old(&self) -> &str {
        &self.old
    }

    /// Returns the version after stamping.
    #[must_use]
    pub fn new_version(&self) -> &str {
        &self.new
    }
}

/// Result of an in-memory rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampedContent {
    content: String,
    changes: Vec<VersionChange>,
}

impl StampedContent {
    /// Returns the rewritten content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns every declaration that was rewritten.
    #[must_use]
    pub fn changes(&self) -> &[VersionChange] {
        &self.changes
    }

    /// Consumes self, returning the rewritten content.
    #[must_use]
    pub fn into_content(self) -> String {
        self.content
    }
}

/// Outcome of [`increment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampReport {
    path: PathBuf,
    changes: Vec<VersionChange>,
    written: bool,
}

impl StampReport {
    /// Returns the stamped file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns every declaration that was rewritten.
    #[must_use]
    pub fn changes(&self) -> &[VersionChange] {
        &self.changes
    }

    /// Returns false when the template had no placeholder and the file was left alone.
    #[must_use]
    pub const fn written(&self) -> bool {
        self.written
    }
}

/// Applies `spec` to a dotted `version` string.
///
/// Each `+` field at index `i` replaces `version[i]` with its value plus one.
/// Literal fields are accepted but the on-disk value is kept.
///
/// # Errors
///
/// - [`VersioningError::FieldOutOfRange`] if a `+` sits beyond the last field of `version`.
/// - [`VersioningError::Overflow`] if a field cannot be incremented.
pub fn increment_version(
    version: &str,
    spec: &VersioningSpec,
) -> std::result::Result<String, VersioningError> {
    let mut parts: Vec<String> = version.split('.').map(str::to_string).collect();

    for (index, field) in spec.fields().iter().enumerate() {
        if *field != VersionField::Increment {
            continue;
        }
        let Some(part) = parts.get_mut(index) else {
            return Err(VersioningError::FieldOutOfRange {
                index,
                version: version.to_string(),
            });
        };
        let bumped = part
            .parse::<u64>()
            .ok()
            .and_then(|value| value.checked_add(1))
            .ok_or_else(|| VersioningError::Overflow {
                index,
                version: version.to_string(),
            })?;
        *part = bumped.to_string();
    }

    Ok(parts.join("."))
}

/// Splits a line into its body and line ending (`"\r\n"`, `"\n"` or `""`).
fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Rewrites every version declaration in `content`.
///
/// A matching line is replaced as a whole by the regenerated declaration;
/// its line ending is kept. Lines without a declaration are copied verbatim.
///
/// # Errors
///
/// Propagates [`increment_version`] errors; nothing is rewritten in that case.
pub fn stamp_content(
    content: &str,
    spec: &VersioningSpec,
) -> std::result::Result<StampedContent, VersioningError> {
    let mut output = String::with_capacity(content.len());
    let mut changes = Vec::new();

    for (index, line) in content.split_inclusive('\n').enumerate() {
        let (body, ending) = split_line_ending(line);
        let mut replacement: Option<String> = None;

        for (kind, regex) in DECLARATIONS.iter() {
            let Some(old) = regex.captures(body).and_then(|caps| caps.get(1)) else {
                continue;
            };
            let old = old.as_str();
            let new = increment_version(old, spec)?;
            debug!(attribute = %kind, old, new = %new, line = index + 1, "stamping");
            replacement = Some(kind.render(&new));
            changes.push(VersionChange {
                kind: *kind,
                line: index + 1,
                old: old.to_string(),
                new,
            });
        }

        match replacement {
            Some(declaration) => {
                output.push_str(&declaration);
                output.push_str(ending);
            }
            None => output.push_str(line),
        }
    }

    Ok(StampedContent { content: output, changes })
}

/// Stamps the version declarations of the file at `path` in place.
///
/// # Errors
///
/// - [`FsError::NotFound`] / [`FsError::IoError`] if the file cannot be read or written.
/// - Any [`VersioningError`] from [`stamp_content`]; the file is left untouched.
pub async fn increment(path: &Path, spec: &VersioningSpec) -> Result<StampReport> {
    if !spec.has_placeholder() {
        info!(
            spec = %spec,
            "no '+' placeholder in versioning template, version left unchanged"
        );
        return Ok(StampReport {
            path: path.to_path_buf(),
            changes: Vec::new(),
            written: false,
        });
    }

    let content = tokio::fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            FsError::NotFound(path.display().to_string())
        } else {
            FsError::IoError {
                path: path.display().to_string(),
                source,
            }
        }
    })?;

    let stamped = stamp_content(&content, spec)?;
    for change in stamped.changes() {
        info!(
            file = %path.display(),
            attribute = %change.kind(),
            old = change.old(),
            new = change.new_version(),
            "version bumped"
        );
    }

    let changes = stamped.changes().to_vec();
    tokio::fs::write(path, stamped.into_content())
        .await
        .map_err(|source| FsError::IoError {
            path: path.display().to_string(),
            source,
        })?;

    Ok(StampReport {
        path: path.to_path_buf(),
        changes,
        written: true,
    })
}
