// msb-rs: MSBuild Orchestration Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pre- and post-build hooks.
//!
//! ```text
//! Hook::None                  always succeeds
//! Hook::Custom(dyn BuildHook)
//!   FnHook(|cfg| Ok(true))    closure
//!   CommandHook("cmd line")   shell, MSB_USER_CONFIG=<json>, exit 0 = true
//!
//! run(&UserDefinedConfig) -> Ok(true)  continue
//!                          -> Ok(false) HookError::Rejected
//!                          -> Err(e)    HookError::Failed
//! ```

use std::time::Duration;

use futures_util::future::BoxFuture;
use tracing::{debug, info};

use crate::config::types::UserDefinedConfig;
use crate::core::process::builder::{ProcessBuilder, ProcessFlags};
use crate::error::{HookError, Result};

/// Environment variable carrying the JSON user config to command hooks.
pub const USER_CONFIG_ENV: &str = "MSB_USER_CONFIG";

/// A user-supplied check run before or after the build.
pub trait BuildHook: Send + Sync {
    /// Short description for logs.
    fn name(&self) -> &str;

    /// Returns `Ok(true)` to let the pipeline continue.
    fn run<'a>(&'a self, user_config: &'a UserDefinedConfig) -> BoxFuture<'a, Result<bool>>;
}

/// A configured hook slot.
#[derive(Default)]
pub enum Hook {
    /// No hook; the stage succeeds without doing anything.
    #[default]
    None,
    Custom(Box<dyn BuildHook>),
}

impl Hook {
    /// Wraps any [`BuildHook`].
    pub fn custom(hook: impl BuildHook + 'static) -> Self {
        Self::Custom(Box::new(hook))
    }

    /// Hook backed by a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&UserDefinedConfig) -> Result<bool> + Send + Sync + 'static,
    {
        Self::custom(FnHook::new(f))
    }

    /// Hook running `command` through the platform shell.
    pub fn command(command: impl Into<String>) -> Self {
        Self::custom(CommandHook::new(command))
    }

    /// Builds a command hook from an optional command line.
    #[must_use]
    pub fn from_command_line(command: Option<&str>, timeout: Option<Duration>) -> Self {
        match command.map(str::trim) {
            Some(command) if !command.is_empty() => {
                Self::custom(CommandHook::new(command).with_timeout(timeout))
            }
            _ => Self::None,
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Custom(hook) => hook.name(),
        }
    }

    /// Runs the hook, turning a `false` verdict into an error.
    ///
    /// # Errors
    ///
    /// - [`HookError::Rejected`] if the hook returned `false`.
    /// - [`HookError::Failed`] if the hook returned an error.
    pub async fn invoke(&self, user_config: &UserDefinedConfig) -> Result<()> {
        let Self::Custom(hook) = self else {
            return Ok(());
        };
        match hook.run(user_config).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(HookError::Rejected {
                hook: hook.name().to_string(),
            }
            .into()),
            Err(e) => Err(HookError::Failed {
                hook: hook.name().to_string(),
                message: format!("{e:#}"),
            }
            .into()),
        }
    }
}

impl std::fmt::Debug for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("Hook::None"),
            Self::Custom(hook) => write!(f, "Hook::Custom({})", hook.name()),
        }
    }
}

/// Closure adapter for [`BuildHook`].
pub struct FnHook<F> {
    f: F,
}

impl<F> FnHook<F>
where
    F: Fn(&UserDefinedConfig) -> Result<bool> + Send + Sync,
{
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> BuildHook for FnHook<F>
where
    F: Fn(&UserDefinedConfig) -> Result<bool> + Send + Sync,
{
    fn name(&self) -> &'static str {
        "fn"
    }

    fn run<'a>(&'a self, user_config: &'a UserDefinedConfig) -> BoxFuture<'a, Result<bool>> {
        let verdict = (self.f)(user_config);
        Box::pin(async move { verdict })
    }
}

/// Runs a shell command line; exit code 0 means success.
///
/// The user config is passed as compact JSON in [`USER_CONFIG_ENV`].
#[derive(Debug, Clone)]
pub struct CommandHook {
    command: String,
    timeout: Option<Duration>,
}

impl CommandHook {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: None,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    async fn execute(&self, user_config: &UserDefinedConfig) -> Result<bool> {
        debug!(command = %self.command, "running hook command");
        let output = ProcessBuilder::raw(self.command.as_str())
            .env(USER_CONFIG_ENV, user_config.to_json_string())
            .flag(ProcessFlags::ALLOW_FAILURE)
            .name("hook")
            .log_and_capture()
            .timeout_opt(self.timeout)
            .run()
            .await?;

        let accepted = output.exit_code() == 0;
        info!(
            command = %self.command,
            exit_code = output.exit_code(),
            accepted,
            "hook finished"
        );
        Ok(accepted)
    }
}

impl BuildHook for CommandHook {
    fn name(&self) -> &str {
        &self.command
    }

    fn run<'a>(&'a self, user_config: &'a UserDefinedConfig) -> BoxFuture<'a, Result<bool>> {
        Box::pin(self.execute(user_config))
    }
}
