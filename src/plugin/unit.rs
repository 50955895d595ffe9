//! Plugin unit records owned by the loader.

use std::fmt;
use std::path::PathBuf;

use crate::error::LoadError;
use crate::plugin::metadata::{Metadata, RawMetadata};
use crate::user::command::CommandDecl;

/// Index of a unit in the loader's unit list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub usize);

/// Where a unit came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitSource {
    /// A `*.toml` manifest on disk.
    Manifest(PathBuf),
    /// Compiled into the host.
    Bundled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
    Failed,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoadState::Unloaded => "unloaded",
            LoadState::Loaded => "loaded",
            LoadState::Failed => "failed",
        };
        f.pad(s)
    }
}

/// One discovered plugin unit.
#[derive(Debug)]
pub struct PluginUnit {
    /// Unique identifier (manifest file stem or bundled plugin id).
    pub id: String,
    pub source: UnitSource,
    state: LoadState,
    error: Option<LoadError>,
    metadata: Metadata,
    declared: Vec<CommandDecl>,
}

impl PluginUnit {
    pub fn new(id: impl Into<String>, source: UnitSource) -> Self {
        Self {
            id: id.into(),
            source,
            state: LoadState::Unloaded,
            error: None,
            metadata: Metadata::default(),
            declared: Vec::new(),
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Commands harvested at load time (empty unless `Loaded`).
    pub fn declared(&self) -> &[CommandDecl] {
        &self.declared
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Record the outcome of loading. Only an `Unloaded` unit transitions;
    /// later outcomes are ignored so a unit's load runs at most once.
    pub(crate) fn finish(&mut self, outcome: Result<(RawMetadata, Vec<CommandDecl>), LoadError>) {
        if self.state != LoadState::Unloaded {
            debug!("{}: already {}, ignoring second load", self.id, self.state);
            return;
        }
        match outcome {
            Ok((raw, declared)) => {
                self.metadata = Metadata::extract(&self.id, &raw);
                self.declared = declared;
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                self.error = Some(err);
                self.state = LoadState::Failed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_only_once() {
        let mut unit = PluginUnit::new("a", UnitSource::Bundled);
        assert_eq!(unit.state(), LoadState::Unloaded);

        unit.finish(Err(LoadError::Panicked("boom".into())));
        assert_eq!(unit.state(), LoadState::Failed);

        unit.finish(Ok((RawMetadata::default(), Vec::new())));
        assert_eq!(unit.state(), LoadState::Failed);
        assert!(unit.error().is_some());
    }
}
