//! Command registry - lookup by name or alias.
//!
//! Keys are matched case-insensitively and exactly. Every key maps to one
//! entry; a command that would take an existing key is refused as a whole
//! and the first owner keeps it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RegistrationError;
use crate::plugin::unit::{PluginUnit, UnitId};
use crate::user::command::{CommandDecl, Handler};

/// Owner label used for keys the host reserves for itself.
pub const BUILTIN_OWNER: &str = "builtin";

/// One invokable command.
pub struct CommandEntry {
    pub name: String,
    pub aliases: Vec<String>,
    /// Owning unit, as an index into the loader's units.
    pub unit: UnitId,
    pub handler: Arc<dyn Handler>,
}

impl CommandEntry {
    /// Canonical name followed by aliases.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

impl std::fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("unit", &self.unit)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOwner {
    Builtin,
    Entry(usize),
}

/// Commands of one category/group bucket, for help output.
#[derive(Debug)]
pub struct CommandGroup<'a> {
    pub category: &'a str,
    pub group: &'a str,
    pub entries: Vec<&'a CommandEntry>,
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    keys: HashMap<String, KeyOwner>,
}

/// Case folding used for every command key, builtin or plugin.
pub(crate) fn normalize(key: &str) -> String {
    key.to_lowercase()
}

fn valid_key(key: &str) -> bool {
    !key.is_empty() && !key.chars().any(char::is_whitespace)
}

impl CommandRegistry {
    /// An empty registry whose `reserved` keys already belong to the host.
    pub fn with_reserved<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Self {
        let mut registry = Self::default();
        for key in reserved {
            registry.keys.insert(normalize(key), KeyOwner::Builtin);
        }
        registry
    }

    /// Harvest the declared commands of every loaded unit, in unit order.
    ///
    /// Refused commands are returned as diagnostics; they never stop the build.
    pub fn build<'a>(
        reserved: impl IntoIterator<Item = &'a str>,
        units: &[PluginUnit],
    ) -> (Self, Vec<RegistrationError>) {
        let mut registry = Self::with_reserved(reserved);
        let mut rejected = Vec::new();

        for (index, unit) in units.iter().enumerate() {
            if !unit.is_loaded() {
                continue;
            }
            for decl in unit.declared() {
                if let Err(err) = registry.register(UnitId(index), units, decl.clone()) {
                    warn!("{}", err);
                    rejected.push(err);
                }
            }
        }

        (registry, rejected)
    }

    /// Insert one command, all-or-nothing.
    ///
    /// `units` is only used to name the owners in diagnostics.
    pub fn register(
        &mut self,
        unit: UnitId,
        units: &[PluginUnit],
        decl: CommandDecl,
    ) -> Result<(), RegistrationError> {
        let unit_name = |id: UnitId| {
            units
                .get(id.0)
                .map(|u| u.id.clone())
                .unwrap_or_else(|| format!("unit {}", id.0))
        };

        let CommandDecl {
            name,
            aliases,
            handler,
        } = decl;

        // Own keys first, de-duplicated case-insensitively.
        let mut claimed: Vec<String> = Vec::with_capacity(aliases.len() + 1);
        for key in std::iter::once(&name).chain(aliases.iter()) {
            if !valid_key(key) {
                return Err(RegistrationError::InvalidKey {
                    unit: unit_name(unit),
                    key: key.clone(),
                });
            }
            let normalized = normalize(key);
            if !claimed.contains(&normalized) {
                claimed.push(normalized);
            }
        }

        for key in &claimed {
            if let Some(owner) = self.keys.get(key) {
                let owner = match owner {
                    KeyOwner::Builtin => BUILTIN_OWNER.to_string(),
                    KeyOwner::Entry(index) => {
                        let entry = &self.entries[*index];
                        format!("'{}' of {}", entry.name, unit_name(entry.unit))
                    }
                };
                return Err(RegistrationError::Conflict {
                    unit: unit_name(unit),
                    command: name,
                    key: key.clone(),
                    owner,
                });
            }
        }

        let index = self.entries.len();
        for key in &claimed {
            self.keys.insert(key.clone(), KeyOwner::Entry(index));
        }

        let name_key = normalize(&name);
        let mut kept_aliases = Vec::new();
        for alias in aliases {
            let key = normalize(&alias);
            if key != name_key && !kept_aliases.iter().any(|a: &String| normalize(a) == key) {
                kept_aliases.push(alias);
            }
        }

        debug!("registered '{}' {:?}", name, kept_aliases);
        self.entries.push(CommandEntry {
            name,
            aliases: kept_aliases,
            unit,
            handler,
        });
        Ok(())
    }

    /// Find a command by name or alias, ignoring case.
    pub fn find(&self, key: &str) -> Option<&CommandEntry> {
        match self.keys.get(&normalize(key))? {
            KeyOwner::Entry(index) => self.entries.get(*index),
            KeyOwner::Builtin => None,
        }
    }

    /// Whether `key` is reserved for a host builtin.
    pub fn is_reserved(&self, key: &str) -> bool {
        self.keys.get(&normalize(key)) == Some(&KeyOwner::Builtin)
    }

    /// All commands in registration order.
    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Commands bucketed by the owning unit's category/group.
    ///
    /// Buckets appear in order of their first command; commands keep
    /// registration order inside a bucket.
    pub fn groups<'a>(&'a self, units: &'a [PluginUnit]) -> Vec<CommandGroup<'a>> {
        let mut groups: Vec<CommandGroup<'a>> = Vec::new();
        for entry in &self.entries {
            let (category, group) = match units.get(entry.unit.0) {
                Some(unit) => (
                    unit.metadata().category.as_str(),
                    unit.metadata().group.as_str(),
                ),
                None => (crate::plugin::metadata::UNKNOWN, crate::plugin::metadata::UNKNOWN),
            };
            match groups
                .iter_mut()
                .find(|g| g.category == category && g.group == group)
            {
                Some(bucket) => bucket.entries.push(entry),
                None => groups.push(CommandGroup {
                    category,
                    group,
                    entries: vec![entry],
                }),
            }
        }
        groups
    }
}
