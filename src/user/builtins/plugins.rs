//! Plugins builtin - load diagnostics.

use std::io::{self, Write};

use crate::console::style::Style;
use crate::error::RegistrationError;
use crate::plugin::unit::{LoadState, PluginUnit, UnitSource};

pub fn run(
    units: &[PluginUnit],
    rejected: &[RegistrationError],
    style: &Style,
    out: &mut dyn Write,
) -> io::Result<()> {
    if units.is_empty() {
        writeln!(out, "No plugin units found.")?;
    } else {
        writeln!(out, "{}", style.emphasis("Plugin units:"))?;
    }

    for unit in units {
        // Pad before painting; escape codes would count toward the width.
        let padded = format!("{:8}", unit.state());
        let state = match unit.state() {
            LoadState::Loaded => style.success(padded),
            LoadState::Failed => style.error(padded),
            LoadState::Unloaded => style.muted(padded),
        };
        let source = match &unit.source {
            UnitSource::Manifest(path) => path.display().to_string(),
            UnitSource::Bundled => "bundled".to_string(),
        };
        writeln!(out, "  {:16} {} {}", unit.id, state, style.muted(source))?;

        if unit.is_loaded() {
            writeln!(out, "      {}", unit.metadata())?;
            let names: Vec<&str> = unit.declared().iter().map(|d| d.name.as_str()).collect();
            if !names.is_empty() {
                writeln!(out, "      commands: {}", names.join(", "))?;
            }
        }
        if let Some(err) = unit.error() {
            writeln!(out, "      {}", style.error(err))?;
        }
    }

    if !rejected.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", style.warning("Rejected commands:"))?;
        for err in rejected {
            writeln!(out, "  {}", err)?;
        }
    }
    Ok(())
}
