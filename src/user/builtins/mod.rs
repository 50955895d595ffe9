//! Commands owned by the host itself.
//!
//! Builtins are resolved before the registry, and their keys are reserved
//! so no plugin can register a command the user could never reach.

pub mod help;
pub mod history;
pub mod plugins;

use crate::user::registry::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Help,
    Exit,
    History,
    Plugins,
}

impl Builtin {
    pub const ALL: [Builtin; 4] = [
        Builtin::Help,
        Builtin::Exit,
        Builtin::History,
        Builtin::Plugins,
    ];

    /// Primary key followed by aliases.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Builtin::Help => &["help", "?"],
            Builtin::Exit => &["exit", "quit"],
            Builtin::History => &["history"],
            Builtin::Plugins => &["plugins"],
        }
    }

    pub fn name(self) -> &'static str {
        self.keys()[0]
    }

    pub fn description(self) -> &'static str {
        match self {
            Builtin::Help => "List commands, or show details for one: help [command]",
            Builtin::Exit => "Leave the shell",
            Builtin::History => "Show this session's input: history [clear]",
            Builtin::Plugins => "Show every plugin unit, its load state and load problems",
        }
    }

    pub fn resolve(key: &str) -> Option<Builtin> {
        let key = normalize(key);
        Builtin::ALL
            .into_iter()
            .find(|b| b.keys().iter().any(|k| normalize(k) == key))
    }

    /// Every key a plugin may not claim.
    pub fn reserved_keys() -> impl Iterator<Item = &'static str> {
        Builtin::ALL.into_iter().flat_map(|b| b.keys().iter().copied())
    }
}
