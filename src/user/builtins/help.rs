//! Help builtin - lists commands grouped by category/group.

use std::io::{self, Write};

use crate::console::style::Style;
use crate::plugin::unit::PluginUnit;
use crate::user::builtins::Builtin;
use crate::user::registry::{CommandEntry, CommandRegistry};

/// What help needs to see of the session.
pub struct HelpView<'a> {
    pub registry: &'a CommandRegistry,
    pub units: &'a [PluginUnit],
    /// Failed units plus refused commands.
    pub problems: usize,
    pub style: &'a Style,
}

pub fn run(view: &HelpView<'_>, topic: Option<&str>, out: &mut dyn Write) -> io::Result<()> {
    match topic {
        Some(key) => show_command_help(view, key, out),
        None => show_all_commands(view, out),
    }
}

fn label(entry: &CommandEntry) -> String {
    if entry.aliases.is_empty() {
        entry.name.clone()
    } else {
        format!("{} ({})", entry.name, entry.aliases.join(", "))
    }
}

fn show_all_commands(view: &HelpView<'_>, out: &mut dyn Write) -> io::Result<()> {
    let style = view.style;
    writeln!(out, "{}", style.emphasis("Available commands:"))?;

    let groups = view.registry.groups(view.units);
    if groups.is_empty() {
        writeln!(out, "\n  {}", style.muted("(no plugin commands registered)"))?;
    }

    for group in groups {
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            style.info(format!("[{}/{}]", group.category, group.group))
        )?;
        for entry in group.entries {
            let (description, author) = match view.units.get(entry.unit.0) {
                Some(unit) => (
                    unit.metadata().description.as_str(),
                    unit.metadata().author.as_str(),
                ),
                None => (crate::plugin::metadata::UNKNOWN, crate::plugin::metadata::UNKNOWN),
            };
            writeln!(
                out,
                "  {:20} - {} {}",
                label(entry),
                description,
                style.muted(format!("(by {})", author))
            )?;
        }
    }

    writeln!(out)?;
    let builtins: Vec<String> = Builtin::ALL
        .iter()
        .map(|b| match b.keys() {
            [name] => name.to_string(),
            [name, rest @ ..] => format!("{} ({})", name, rest.join(", ")),
            [] => String::new(),
        })
        .collect();
    writeln!(out, "Built-in: {}", builtins.join(", "))?;
    writeln!(out, "Type 'help <command>' for detailed usage.")?;

    if view.problems > 0 {
        writeln!(
            out,
            "{}",
            style.warning(format!(
                "{} plugin problem(s) at startup; type 'plugins' for details.",
                view.problems
            ))
        )?;
    }
    Ok(())
}

fn show_command_help(view: &HelpView<'_>, key: &str, out: &mut dyn Write) -> io::Result<()> {
    let style = view.style;

    if let Some(builtin) = Builtin::resolve(key) {
        writeln!(out, "Command: {} (built-in)", style.emphasis(builtin.name()))?;
        if builtin.keys().len() > 1 {
            writeln!(out, "Aliases: {}", builtin.keys()[1..].join(", "))?;
        }
        writeln!(out, "{}", builtin.description())?;
        return Ok(());
    }

    let Some(entry) = view.registry.find(key) else {
        writeln!(out, "{}", style.error(format!("Unknown command: {}", key)))?;
        writeln!(out, "Type 'help' to see available commands.")?;
        return Ok(());
    };

    writeln!(out, "Command: {}", style.emphasis(&entry.name))?;
    if !entry.aliases.is_empty() {
        writeln!(out, "Aliases: {}", entry.aliases.join(", "))?;
    }
    if let Some(unit) = view.units.get(entry.unit.0) {
        let meta = unit.metadata();
        writeln!(out, "Plugin:  {}", unit.id)?;
        writeln!(out, "Section: {}", meta.section())?;
        writeln!(out, "Author:  {}", meta.author)?;
        writeln!(out, "{}", meta.description)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliResult;
    use crate::plugin::metadata::RawMetadata;
    use crate::plugin::unit::UnitSource;
    use crate::user::command::{CommandContext, CommandDecl};

    fn noop(_ctx: &CommandContext<'_>) -> CliResult<()> {
        Ok(())
    }

    fn fixture() -> (CommandRegistry, Vec<PluginUnit>) {
        let mut echo = PluginUnit::new("echo", UnitSource::Bundled);
        echo.finish(Ok((
            RawMetadata::new("Ann", "text", "general", "Echo text"),
            vec![CommandDecl::new("echo", noop).alias("e")],
        )));
        let mut calc = PluginUnit::new("calc", UnitSource::Bundled);
        calc.finish(Ok((
            RawMetadata::new("Bob", "math", "office", "Calculator"),
            vec![CommandDecl::new("calc", noop)],
        )));
        let units = vec![echo, calc];
        let (registry, _) = CommandRegistry::build(Builtin::reserved_keys(), &units);
        (registry, units)
    }

    fn render(topic: Option<&str>, problems: usize) -> String {
        let (registry, units) = fixture();
        let view = HelpView {
            registry: &registry,
            units: &units,
            problems,
            style: &Style::plain(),
        };
        let mut out = Vec::new();
        run(&view, topic, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_listing_groups_every_command_once() {
        let text = render(None, 0);
        assert!(text.contains("[text/general]\n  echo (e)"));
        assert!(text.contains("[math/office]\n  calc"));
        assert_eq!(text.matches("echo (e)").count(), 1);
        assert_eq!(text.matches("  calc ").count(), 1);
        assert!(text.contains("Echo text (by Ann)"));
        assert!(text.contains("Built-in: help (?), exit (quit), history, plugins"));
        assert!(!text.contains("plugin problem"));
    }

    #[test]
    fn test_listing_mentions_problems() {
        assert!(render(None, 2).contains("2 plugin problem(s)"));
    }

    #[test]
    fn test_command_detail() {
        let text = render(Some("E"), 0);
        assert!(text.starts_with("Command: echo\nAliases: e\n"));
        assert!(text.contains("Section: text/general"));
        assert!(text.contains("Author:  Ann"));
    }

    #[test]
    fn test_builtin_and_unknown_detail() {
        assert!(render(Some("quit"), 0).starts_with("Command: exit (built-in)\nAliases: quit\n"));
        assert!(render(Some("nope"), 0).starts_with("Unknown command: nope\n"));
    }
}
