//! Session assembly: load, register, then run.
//!
//! The registry is complete before the dispatcher sees its first line, and
//! read-only afterwards.

use std::io::{self, Write};

use crate::config::HostConfig;
use crate::console::style::Style;
use crate::console::tty::LineSource;
use crate::error::RegistrationError;
use crate::plugin::bundled::BundledPlugin;
use crate::plugin::loader::Loader;
use crate::plugin::unit::PluginUnit;
use crate::user::builtins::Builtin;
use crate::user::builtins::history::CommandHistory;
use crate::user::dispatcher::{Dispatcher, Outcome};
use crate::user::registry::CommandRegistry;

pub struct Session {
    units: Vec<PluginUnit>,
    registry: CommandRegistry,
    rejected: Vec<RegistrationError>,
    style: Style,
    history_limit: usize,
    prompt: String,
}

impl Session {
    /// Load every configured plugin unit and build the registry.
    pub fn build(config: &HostConfig) -> Self {
        let bundled = if config.bundled_plugins {
            bundled_plugins()
        } else {
            Vec::new()
        };
        Self::build_with(config, config.style(), bundled)
    }

    /// Like [`Session::build`] with an explicit style and bundled plugin set.
    pub fn build_with(
        config: &HostConfig,
        style: Style,
        bundled: Vec<Box<dyn BundledPlugin>>,
    ) -> Self {
        let mut loader = bundled
            .into_iter()
            .fold(Loader::new(config.plugin_dirs.clone()), Loader::with_bundled);
        loader.load_all();
        let units = loader.into_units();

        let (registry, rejected) = CommandRegistry::build(Builtin::reserved_keys(), &units);
        info!(
            "{} command(s) registered, {} rejected",
            registry.len(),
            rejected.len()
        );

        Self {
            units,
            registry,
            rejected,
            style,
            history_limit: config.history_limit,
            prompt: config.prompt.clone(),
        }
    }

    pub fn units(&self) -> &[PluginUnit] {
        &self.units
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn rejected(&self) -> &[RegistrationError] {
        &self.rejected
    }

    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(
            &self.registry,
            &self.units,
            &self.rejected,
            self.style,
            CommandHistory::new(self.history_limit),
        )
    }

    /// Interactive loop on the given streams.
    ///
    /// Use [`Terminal`](crate::console::tty::Terminal) for stdin so handlers
    /// can prompt on it too.
    pub fn run_interactive<L: LineSource, W: Write>(&self, input: L, out: W) -> io::Result<()> {
        let mut dispatcher = self.dispatcher();
        crate::console::tty::run(&mut dispatcher, input, out, &self.prompt)
    }

    /// Dispatch a single line and return.
    pub fn run_once<W: Write>(&self, line: &str, mut out: W) -> io::Result<Outcome> {
        let mut dispatcher = self.dispatcher();
        let outcome = dispatcher.dispatch(line, &mut out)?;
        out.flush()?;
        Ok(outcome)
    }
}

#[cfg(feature = "bundled")]
fn bundled_plugins() -> Vec<Box<dyn BundledPlugin>> {
    crate::plugin::bundled::all()
}

#[cfg(not(feature = "bundled"))]
fn bundled_plugins() -> Vec<Box<dyn BundledPlugin>> {
    Vec::new()
}
