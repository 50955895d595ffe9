//! pscli - a plugin command host.
//!
//! Plugin units (TOML manifests on disk, or plugins compiled into the host)
//! declare metadata and named commands. The host loads every unit in
//! isolation, registers their commands by name and alias, and runs an
//! interactive loop that resolves each input line to a command and invokes
//! it without letting a failing plugin take the host down.

#[macro_use]
extern crate log;

pub mod config;
pub mod console;
pub mod error;
pub mod host;
pub mod plugin;
pub mod user;
pub mod utils;

pub use error::CliResult;
pub use host::Session;
