// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              MsbError (~24 bytes)
//!                     |
//!   +------+------+---+---+------+------+
//!   |      |      |       |      |      |
//!   v      v      v       v      v      v
//! Bail   Cfg   Proc      Fs   Version  Hook
//! Box<str> Box  Box      Box    Box     Box
//!
//! Sub-errors (unboxed internally):
//!   Config     ParseError, MissingKey, InvalidValue, NotFound
//!   Process    ExecutableNotFound, SpawnFailed, NonZeroExit, Interrupted,
//!              TimedOut
//!   Fs         NotFound, IoError
//!   Versioning InvalidSpec, FieldOutOfRange, Overflow
//!   Hook       Rejected, Failed
//! ```
//!
//! Components return `anyhow::Result` carrying one of the sub-errors so
//! callers can `downcast_ref` to the concrete failure kind.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum MsbError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// Version stamping error.
    #[error("versioning error: {0}")]
    Versioning(#[from] Box<VersioningError>),

    /// Build hook error.
    #[error("hook error: {0}")]
    Hook(#[from] Box<HookError>),
}

/// Create a fatal [`MsbError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> MsbError {
    MsbError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for MsbError {
                fn from(err: $error) -> Self {
                    MsbError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    ProcessError => Process,
    FsError => Fs,
    VersioningError => Versioning,
    HookError => Hook,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// No configuration could be found.
    #[error("config file not found: {0}")]
    NotFound(String),
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Tool executable absent from every configured search root.
    #[error("executable not found: '{name}' (searched: {})", display_roots(.roots))]
    ExecutableNotFound { name: String, roots: Vec<String> },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with a code outside its success set.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit {
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    /// Process was cancelled before it finished.
    #[error("process '{command}' was interrupted")]
    Interrupted { command: String },

    /// Process exceeded its time limit and was killed.
    #[error("process '{command}' timed out after {seconds}s")]
    TimedOut { command: String, seconds: u64 },
}

fn display_roots(roots: &[String]) -> String {
    if roots.is_empty() {
        "no paths configured".to_string()
    } else {
        roots.join(", ")
    }
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Versioning Errors ---

/// Errors raised while parsing a versioning template or rewriting a version.
#[derive(Debug, Error)]
pub enum VersioningError {
    /// The template is empty or contains a field that is neither `+` nor an integer.
    #[error("invalid versioning template '{spec}': {message}")]
    InvalidSpec { spec: String, message: String },

    /// A placeholder points past the last field of the matched version.
    #[error("placeholder at field {index} is out of range for version '{version}'")]
    FieldOutOfRange { index: usize, version: String },

    /// Incrementing a field would overflow.
    #[error("field {index} of version '{version}' cannot be incremented")]
    Overflow { index: usize, version: String },
}

// --- Hook Errors ---

/// Pre/post build hook errors.
#[derive(Debug, Error)]
pub enum HookError {
    /// Hook ran and reported failure.
    #[error("hook '{hook}' reported failure")]
    Rejected { hook: String },

    /// Hook could not be executed.
    #[error("hook '{hook}' failed: {message}")]
    Failed { hook: String, message: String },
}
