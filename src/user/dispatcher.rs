//! Dispatcher - resolves input lines against the registry and runs handlers.
//!
//! One line is one cycle: tokenize, resolve (builtins first, then the
//! registry), invoke. Every plugin failure is caught here and reported; the
//! only way out of the loop is `exit`/`quit` (or end of input).

use std::io::{self, Write};

use crate::console::style::Style;
use crate::error::{InvocationError, RegistrationError, ResolutionError};
use crate::plugin::unit::PluginUnit;
use crate::user::builtins::history::CommandHistory;
use crate::user::builtins::{self, Builtin, help::HelpView};
use crate::user::command::{CommandContext, ParsedLine};
use crate::user::registry::{CommandEntry, CommandRegistry};
use crate::utils::protected;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    AwaitingInput,
    Resolving,
    Invoking,
    Terminated,
}

/// What one dispatch cycle did.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Blank line.
    Empty,
    Builtin(Builtin),
    /// A plugin command returned normally.
    Completed { command: String },
    NotFound(ResolutionError),
    /// A plugin command failed; the message was already reported.
    Failed { command: String, message: String },
}

enum Resolved<'r> {
    Builtin(Builtin),
    Command(&'r CommandEntry),
}

pub struct Dispatcher<'r> {
    registry: &'r CommandRegistry,
    units: &'r [PluginUnit],
    rejected: &'r [RegistrationError],
    style: Style,
    history: CommandHistory,
    state: State,
}

impl<'r> Dispatcher<'r> {
    pub fn new(
        registry: &'r CommandRegistry,
        units: &'r [PluginUnit],
        rejected: &'r [RegistrationError],
        style: Style,
        history: CommandHistory,
    ) -> Self {
        Self {
            registry,
            units,
            rejected,
            style,
            history,
            state: State::Idle,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn is_terminated(&self) -> bool {
        self.state == State::Terminated
    }

    /// Move from `Idle` to `AwaitingInput`; called when the prompt first shows.
    pub fn start(&mut self) {
        if self.state == State::Idle {
            self.state = State::AwaitingInput;
        }
    }

    /// End the session (end of input).
    pub fn terminate(&mut self) {
        self.state = State::Terminated;
    }

    /// Run one dispatch cycle for `line`, writing diagnostics to `out`.
    ///
    /// Handler output goes straight to the terminal, not through `out`.
    pub fn dispatch(&mut self, line: &str, out: &mut dyn Write) -> io::Result<Outcome> {
        if self.state == State::Terminated {
            return Ok(Outcome::Empty);
        }
        self.start();

        let Some(parsed) = ParsedLine::parse(line) else {
            return Ok(Outcome::Empty);
        };
        self.history.push(parsed.raw);

        self.state = State::Resolving;
        let resolved = match self.resolve(parsed.command) {
            Ok(resolved) => resolved,
            Err(err) => {
                debug!("{}", err);
                writeln!(
                    out,
                    "{}",
                    self.style.error(format!("Unknown command: {}", err.key))
                )?;
                writeln!(out, "Type 'help' to see available commands.")?;
                self.state = State::AwaitingInput;
                return Ok(Outcome::NotFound(err));
            }
        };

        self.state = State::Invoking;
        let outcome = match resolved {
            Resolved::Builtin(builtin) => self.run_builtin(builtin, &parsed, out)?,
            Resolved::Command(entry) => self.invoke(entry, &parsed, out)?,
        };

        if self.state != State::Terminated {
            self.state = State::AwaitingInput;
        }
        Ok(outcome)
    }

    fn resolve(&self, key: &str) -> Result<Resolved<'r>, ResolutionError> {
        if let Some(builtin) = Builtin::resolve(key) {
            return Ok(Resolved::Builtin(builtin));
        }
        self.registry
            .find(key)
            .map(Resolved::Command)
            .ok_or_else(|| ResolutionError {
                key: key.to_string(),
            })
    }

    fn invoke(
        &self,
        entry: &CommandEntry,
        line: &ParsedLine<'_>,
        out: &mut dyn Write,
    ) -> io::Result<Outcome> {
        let ctx = CommandContext {
            line,
            name: &entry.name,
            style: &self.style,
        };
        debug!("invoking '{}' with {:?}", entry.name, line.args);

        let result = match protected(|| entry.handler.call(&ctx)) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(InvocationError::new(&entry.name, format!("{:#}", err))),
            Err(panic) => Err(InvocationError::new(
                &entry.name,
                format!("panicked: {}", panic),
            )),
        };

        match result {
            Ok(()) => Ok(Outcome::Completed {
                command: entry.name.clone(),
            }),
            Err(err) => {
                warn!("{}", err);
                writeln!(out, "{}", self.style.error(&err))?;
                Ok(Outcome::Failed {
                    command: err.command,
                    message: err.message,
                })
            }
        }
    }

    fn run_builtin(
        &mut self,
        builtin: Builtin,
        line: &ParsedLine<'_>,
        out: &mut dyn Write,
    ) -> io::Result<Outcome> {
        match builtin {
            Builtin::Help => {
                let problems = self.units.iter().filter(|u| !u.is_loaded()).count()
                    + self.rejected.len();
                let view = HelpView {
                    registry: self.registry,
                    units: self.units,
                    problems,
                    style: &self.style,
                };
                builtins::help::run(&view, line.args.get(0), out)?;
            }
            Builtin::Exit => {
                self.state = State::Terminated;
            }
            Builtin::History => {
                builtins::history::run(&mut self.history, &line.args, &self.style, out)?;
            }
            Builtin::Plugins => {
                builtins::plugins::run(self.units, self.rejected, &self.style, out)?;
            }
        }
        Ok(Outcome::Builtin(builtin))
    }
}
