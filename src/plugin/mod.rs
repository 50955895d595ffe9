//! Plugin discovery and loading.
//!
//! - `unit.rs` - plugin unit records and load states
//! - `metadata.rs` - descriptive fields, defaulting to "unknown"
//! - `manifest.rs` - the on-disk TOML unit format
//! - `exec.rs` - handler that runs a manifest command as a child process
//! - `loader.rs` - discovery with per-unit failure capture
//! - `bundled/` - plugins compiled into the host

pub mod bundled;
pub mod exec;
pub mod loader;
pub mod manifest;
pub mod metadata;
pub mod unit;

pub use loader::Loader;
pub use metadata::Metadata;
pub use unit::{LoadState, PluginUnit, UnitId};
