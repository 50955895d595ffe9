//! Handler contract and execution context definitions.

use std::fmt;
use std::sync::Arc;

use crate::CliResult;
use crate::console::style::Style;

/// Parsed command arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args<'a> {
    args: Vec<&'a str>,
}

impl<'a> Args<'a> {
    /// Create Args from a slice of string references.
    pub fn new(args: Vec<&'a str>) -> Self {
        Self { args }
    }

    /// Get argument at index (0 is first argument after command name).
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).copied()
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if no arguments.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Iterate over arguments.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.args.iter().copied()
    }

    /// Owned copies, for handing to child processes.
    pub fn to_vec(&self) -> Vec<String> {
        self.args.iter().map(|s| s.to_string()).collect()
    }
}

/// One tokenized input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// The original raw input line, trimmed.
    pub raw: &'a str,
    /// The command key as typed.
    pub command: &'a str,
    /// Parsed arguments (excluding command key).
    pub args: Args<'a>,
    /// Raw argument string (everything after command key).
    pub args_raw: &'a str,
}

impl<'a> ParsedLine<'a> {
    /// Split a line into its command key and whitespace-separated arguments.
    ///
    /// Returns `None` for blank input. Quoting is left to plugins.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (command, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], &line[pos..]),
            None => (line, ""),
        };
        let args_raw = rest.trim_start();

        Some(Self {
            raw: line,
            command,
            args: Args::new(args_raw.split_whitespace().collect()),
            args_raw,
        })
    }
}

/// Command execution context.
pub struct CommandContext<'a> {
    /// The tokenized input line.
    pub line: &'a ParsedLine<'a>,
    /// Canonical name of the resolved command.
    pub name: &'a str,
    /// Styling capability for the handler's own output.
    pub style: &'a Style,
}

impl<'a> CommandContext<'a> {
    pub fn args(&self) -> &Args<'a> {
        &self.line.args
    }

    /// Raw argument string (everything after the command key).
    pub fn args_raw(&self) -> &'a str {
        self.line.args_raw
    }

    /// The key the user actually typed (may be an alias).
    pub fn invoked_as(&self) -> &'a str {
        self.line.command
    }
}

/// Trait for anything that can serve a command.
///
/// Returning normally is success; an `Err` (or a panic) is an invocation
/// failure that the dispatcher reports and survives.
pub trait Handler: Send + Sync {
    fn call(&self, ctx: &CommandContext<'_>) -> CliResult<()>;
}

impl<F> Handler for F
where
    F: Fn(&CommandContext<'_>) -> CliResult<()> + Send + Sync,
{
    fn call(&self, ctx: &CommandContext<'_>) -> CliResult<()> {
        self(ctx)
    }
}

/// A declared command: canonical name, aliases and handler.
///
/// Produced once per command while a unit loads, then handed to the registry.
#[derive(Clone)]
pub struct CommandDecl {
    pub name: String,
    pub aliases: Vec<String>,
    pub handler: Arc<dyn Handler>,
}

impl CommandDecl {
    pub fn new(name: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }
}

impl fmt::Debug for CommandDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDecl")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}
