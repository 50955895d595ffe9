//! On-disk plugin unit format.
//!
//! A manifest unit is a single TOML file:
//!
//! ```toml
//! author = "Jane"
//! category = "file list"
//! group = "system"
//! description = "Terminal file list generator"
//!
//! [[command]]
//! name = "list"
//! aliases = ["lg", "listgen"]
//! exec = ["python3", "listgen.py"]
//! ```
//!
//! Metadata keys are optional and loosely typed. Command tables are strict:
//! a command without `name` or `exec` makes the whole unit fail to load.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::LoadError;
use crate::plugin::exec::ExecHandler;
use crate::plugin::metadata::RawMetadata;
use crate::user::command::CommandDecl;

#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub author: Option<toml::Value>,
    #[serde(default)]
    pub category: Option<toml::Value>,
    #[serde(default)]
    pub group: Option<toml::Value>,
    #[serde(default)]
    pub description: Option<toml::Value>,
    /// Short spelling of `description`; `description` wins when both are set.
    #[serde(default)]
    pub desc: Option<toml::Value>,
    #[serde(default, rename = "command")]
    pub commands: Vec<CommandDef>,
}

#[derive(Debug, Deserialize)]
pub struct CommandDef {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub exec: Vec<String>,
}

impl Manifest {
    pub fn parse(path: &Path, content: &str) -> Result<Self, LoadError> {
        toml::from_str(content).map_err(|source| LoadError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse the manifest at `path`.
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Turn the manifest into metadata plus process-backed declarations.
    ///
    /// `base_dir` is where relative programs are looked up and where the
    /// child process runs.
    pub fn into_unit(self, base_dir: &Path) -> Result<(RawMetadata, Vec<CommandDecl>), LoadError> {
        let description = match (self.description, self.desc) {
            (Some(description), Some(_)) => {
                warn!("both 'desc' and 'description' are set, using 'description'");
                Some(description)
            }
            (description, desc) => description.or(desc),
        };
        let raw = RawMetadata {
            author: self.author,
            category: self.category,
            group: self.group,
            description,
        };

        let mut declared = Vec::with_capacity(self.commands.len());
        for def in self.commands {
            let Some((program, fixed)) = def.exec.split_first() else {
                return Err(LoadError::EmptyExec { command: def.name });
            };
            let handler = ExecHandler::new(
                resolve_program(base_dir, program),
                fixed.to_vec(),
                base_dir.to_path_buf(),
            );
            declared.push(CommandDecl::new(def.name, handler).aliases(def.aliases));
        }
        Ok((raw, declared))
    }
}

/// Programs given with a path component are relative to the manifest;
/// bare names are left for `PATH` lookup.
fn resolve_program(base_dir: &Path, program: &str) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        base_dir.join(path)
    } else {
        path.to_path_buf()
    }
}
