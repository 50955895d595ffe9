//! Plugins compiled into the host.
//!
//! # Adding a Bundled Plugin
//!
//! 1. Create a new file in `bundled/` (e.g., `bundled/mytool.rs`)
//! 2. Define a struct and implement [`BundledPlugin`]
//! 3. Add it to [`all`]

use crate::CliResult;
use crate::plugin::metadata::RawMetadata;
use crate::user::command::CommandDecl;

pub mod echo;

/// Collects command declarations while a bundled plugin loads.
#[derive(Debug, Default)]
pub struct Declarations {
    commands: Vec<CommandDecl>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare one command.
    pub fn command(&mut self, decl: CommandDecl) -> &mut Self {
        self.commands.push(decl);
        self
    }

    pub fn into_inner(self) -> Vec<CommandDecl> {
        self.commands
    }
}

/// A plugin unit that lives inside the host binary.
pub trait BundledPlugin: Send + Sync {
    /// Unique unit identifier.
    fn id(&self) -> &str;

    fn metadata(&self) -> RawMetadata {
        RawMetadata::default()
    }

    /// Declare the plugin's commands. Called once, at load time.
    fn declare(&self, decls: &mut Declarations) -> CliResult<()>;
}

/// Every plugin shipped with the host.
pub fn all() -> Vec<Box<dyn BundledPlugin>> {
    vec![Box::new(echo::EchoPlugin)]
}
