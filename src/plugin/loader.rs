//! Module Loader - discovers plugin units and loads each one in isolation.
//!
//! A unit that fails to load is recorded as `Failed` with its error and
//! discovery moves on; one broken plugin never hides the others.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::plugin::bundled::{BundledPlugin, Declarations};
use crate::plugin::manifest::Manifest;
use crate::plugin::metadata::RawMetadata;
use crate::plugin::unit::{PluginUnit, UnitSource};
use crate::user::command::CommandDecl;
use crate::utils::protected;

/// Manifest file extension.
pub const MANIFEST_EXT: &str = "toml";

type LoadOutcome = Result<(RawMetadata, Vec<CommandDecl>), LoadError>;

pub struct Loader {
    dirs: Vec<PathBuf>,
    bundled: Vec<Box<dyn BundledPlugin>>,
    units: Vec<PluginUnit>,
    seen: HashSet<PathBuf>,
}

impl Loader {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            bundled: Vec::new(),
            units: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Add a compiled-in plugin. Bundled units load before directory units.
    pub fn with_bundled(mut self, plugin: Box<dyn BundledPlugin>) -> Self {
        self.bundled.push(plugin);
        self
    }

    pub fn units(&self) -> &[PluginUnit] {
        &self.units
    }

    pub fn into_units(self) -> Vec<PluginUnit> {
        self.units
    }

    /// Load every bundled plugin and every manifest under the search roots.
    ///
    /// Each unit is loaded at most once per loader, so calling this again
    /// only picks up units that were not seen before.
    pub fn load_all(&mut self) -> &[PluginUnit] {
        for plugin in std::mem::take(&mut self.bundled) {
            self.load_bundled(plugin.as_ref());
        }

        for dir in self.dirs.clone() {
            for path in candidates(&dir) {
                self.load_manifest(&path);
            }
        }

        let failed = self.units.iter().filter(|u| !u.is_loaded()).count();
        info!(
            "discovered {} plugin unit(s), {} failed",
            self.units.len(),
            failed
        );
        &self.units
    }

    fn load_bundled(&mut self, plugin: &dyn BundledPlugin) {
        let id = self.unique_id(plugin.id(), None);
        let outcome = protected(|| -> LoadOutcome {
            let mut decls = Declarations::new();
            plugin.declare(&mut decls).map_err(LoadError::Declare)?;
            Ok((plugin.metadata(), decls.into_inner()))
        })
        .unwrap_or_else(|msg| Err(LoadError::Panicked(msg)));

        self.push(PluginUnit::new(id, UnitSource::Bundled), outcome);
    }

    fn load_manifest(&mut self, path: &Path) {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let base_dir = key
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        if !self.seen.insert(key) {
            debug!("{}: already loaded, skipping", path.display());
            return;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let id = self.unique_id(&stem, Some(path));

        let outcome = protected(|| Manifest::read(path)?.into_unit(&base_dir))
            .unwrap_or_else(|msg| Err(LoadError::Panicked(msg)));

        self.push(PluginUnit::new(id, UnitSource::Manifest(path.to_path_buf())), outcome);
    }

    fn push(&mut self, mut unit: PluginUnit, outcome: LoadOutcome) {
        match &outcome {
            Ok((_, declared)) => debug!("{}: loaded, {} command(s)", unit.id, declared.len()),
            Err(err) => warn!("{}: {}", unit.id, err),
        }
        unit.finish(outcome);
        self.units.push(unit);
    }

    /// Prefer the short name; fall back to the full path when it is taken.
    fn unique_id(&self, name: &str, path: Option<&Path>) -> String {
        let taken = |id: &str| self.units.iter().any(|u| u.id == id);
        if !name.is_empty() && !taken(name) {
            return name.to_string();
        }
        let mut id = match path {
            Some(path) => path.display().to_string(),
            None => name.to_string(),
        };
        let base = id.clone();
        let mut n = 2;
        while taken(&id) {
            id = format!("{}#{}", base, n);
            n += 1;
        }
        id
    }
}

/// Manifest files directly inside `dir`, in file-name order.
fn candidates(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("plugin directory {}: {}", dir.display(), err);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().map(|e| e == MANIFEST_EXT).unwrap_or(false))
        .collect();
    paths.sort();
    debug!("{}: {} candidate(s)", dir.display(), paths.len());
    paths
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::CliResult;
    use crate::plugin::unit::LoadState;
    use crate::user::command::CommandContext;

    fn noop(_ctx: &CommandContext<'_>) -> CliResult<()> {
        Ok(())
    }

    struct Good;

    impl BundledPlugin for Good {
        fn id(&self) -> &str {
            "good"
        }

        fn declare(&self, decls: &mut Declarations) -> CliResult<()> {
            decls.command(CommandDecl::new("good", noop));
            Ok(())
        }
    }

    struct Failing;

    impl BundledPlugin for Failing {
        fn id(&self) -> &str {
            "failing"
        }

        fn declare(&self, _decls: &mut Declarations) -> CliResult<()> {
            anyhow::bail!("missing dependency")
        }
    }

    struct Panicking;

    impl BundledPlugin for Panicking {
        fn id(&self) -> &str {
            "panicking"
        }

        fn declare(&self, _decls: &mut Declarations) -> CliResult<()> {
            panic!("top-level crash")
        }
    }

    const VALID: &str = r#"
author = "Jane"
category = "file list"
group = "system"

[[command]]
name = "list"
aliases = ["lg"]
exec = ["ls"]
"#;

    #[test]
    fn test_broken_units_do_not_stop_discovery() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a_broken.toml"), "this is = = not toml").unwrap();
        fs::write(dir.path().join("b_list.toml"), VALID).unwrap();
        fs::write(dir.path().join("c_notes.txt"), "ignored").unwrap();

        let mut loader = Loader::new(vec![dir.path().to_path_buf()])
            .with_bundled(Box::new(Failing))
            .with_bundled(Box::new(Panicking))
            .with_bundled(Box::new(Good));
        let units = loader.load_all();

        let states: Vec<(&str, LoadState)> =
            units.iter().map(|u| (u.id.as_str(), u.state())).collect();
        assert_eq!(
            states,
            vec![
                ("failing", LoadState::Failed),
                ("panicking", LoadState::Failed),
                ("good", LoadState::Loaded),
                ("a_broken", LoadState::Failed),
                ("b_list", LoadState::Loaded),
            ]
        );

        assert!(matches!(units[0].error(), Some(LoadError::Declare(_))));
        assert!(
            matches!(units[1].error(), Some(LoadError::Panicked(msg)) if msg == "top-level crash")
        );
        assert!(matches!(units[3].error(), Some(LoadError::Manifest { .. })));

        let list = &units[4];
        assert_eq!(list.metadata().author, "Jane");
        assert_eq!(list.metadata().description, "unknown");
        assert_eq!(list.declared()[0].aliases, vec!["lg"]);
    }

    #[test]
    fn test_ambiguous_description_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("calc.toml"),
            "desc = \"short\"\ndescription = \"long\"\n\n[[command]]\nname = \"calc\"\nexec = [\"bc\"]\n",
        )
        .unwrap();

        let mut loader = Loader::new(vec![dir.path().to_path_buf()]);
        let units = loader.load_all();
        assert_eq!(units[0].state(), LoadState::Loaded);
        assert_eq!(units[0].metadata().description, "long");
        assert_eq!(units[0].declared()[0].name, "calc");
    }

    #[test]
    fn test_missing_directory_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = Loader::new(vec![dir.path().join("nope")]).with_bundled(Box::new(Good));
        assert_eq!(loader.load_all().len(), 1);
    }

    #[test]
    fn test_units_load_once() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("list.toml"), VALID).unwrap();

        let root = dir.path().to_path_buf();
        let mut loader = Loader::new(vec![root.clone(), root]);
        assert_eq!(loader.load_all().len(), 1);
        assert_eq!(loader.load_all().len(), 1);
    }

    #[test]
    fn test_duplicate_stems_get_distinct_ids() {
        let one = tempfile::tempdir().unwrap();
        let two = tempfile::tempdir().unwrap();
        fs::write(one.path().join("list.toml"), VALID).unwrap();
        fs::write(two.path().join("list.toml"), VALID).unwrap();

        let mut loader = Loader::new(vec![one.path().to_path_buf(), two.path().to_path_buf()]);
        let units = loader.load_all();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].id, "list");
        assert_ne!(units[1].id, "list");
    }
}
