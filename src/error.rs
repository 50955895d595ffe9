//! Unified error types for the pscli host.
//!
//! Plugin bodies report failure through [`CliResult`], an alias for
//! `anyhow::Result`, so a handler can bail with any message it likes.
//! The host's own failure modes are typed:
//!
//! - [`LoadError`] - a plugin unit could not be loaded
//! - [`RegistrationError`] - a command was refused by the registry
//! - [`ResolutionError`] - an input line named no known command
//! - [`InvocationError`] - a handler failed while running
//! - [`ConfigError`] - the host configuration could not be assembled
//!
//! None of the plugin-originated kinds ever terminates the REPL; each is
//! turned into a diagnostic at the boundary where it occurs.
//!
//! ## Usage Examples
//!
//! ```ignore
//! anyhow::bail!("Invalid parameter: {}", param);
//! anyhow::ensure!(value > 0, "Value must be positive");
//! ```

use std::path::PathBuf;

/// Result type alias using anyhow::Error.
///
/// This is what command handlers return.
pub type CliResult<T> = anyhow::Result<T>;

/// A plugin unit failed during load.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("command '{command}' declares an empty exec line")]
    EmptyExec { command: String },
    #[error("plugin declaration failed: {0:#}")]
    Declare(anyhow::Error),
    #[error("plugin panicked during load: {0}")]
    Panicked(String),
}

/// A command was refused by the registry. The command is not registered at all.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("{unit}: command '{command}' claims key '{key}' already owned by {owner}")]
    Conflict {
        unit: String,
        command: String,
        key: String,
        owner: String,
    },
    #[error("{unit}: invalid command key '{key}' (must be non-empty, without whitespace)")]
    InvalidKey { unit: String, key: String },
}

/// User input did not match any command.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("command not found: {key}")]
pub struct ResolutionError {
    pub key: String,
}

/// A resolved handler failed during execution.
#[derive(thiserror::Error, Debug)]
#[error("command '{command}' failed: {message}")]
pub struct InvocationError {
    pub command: String,
    pub message: String,
}

impl InvocationError {
    pub fn new(command: &str, message: impl Into<String>) -> Self {
        Self {
            command: command.to_string(),
            message: message.into(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config: {0}")]
    Figment(#[from] Box<figment::Error>),
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}
