//! Session input history and the `history` builtin.

use std::collections::VecDeque;
use std::io::{self, Write};

use chrono::{DateTime, Local};

use crate::console::style::Style;
use crate::user::command::Args;

/// Default number of history entries to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub at: DateTime<Local>,
    pub line: String,
}

/// Command history buffer.
#[derive(Debug)]
pub struct CommandHistory {
    /// Stored lines (newest at back).
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl CommandHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    /// Add a line to history.
    pub fn push(&mut self, line: &str) {
        // Don't add empty lines or duplicates of the last line
        if line.is_empty() || self.limit == 0 {
            return;
        }
        if let Some(last) = self.entries.back() {
            if last.line == line {
                return;
            }
        }

        self.entries.push_back(HistoryEntry {
            at: Local::now(),
            line: line.to_string(),
        });

        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries (oldest first).
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

/// `history` shows the session's input, `history clear` forgets it.
pub fn run(
    history: &mut CommandHistory,
    args: &Args<'_>,
    style: &Style,
    out: &mut dyn Write,
) -> io::Result<()> {
    match args.get(0) {
        Some(arg) if arg.eq_ignore_ascii_case("clear") => {
            history.clear();
            writeln!(out, "History cleared.")?;
        }
        Some(_) => {
            writeln!(out, "{}", style.warning("Usage: history [clear]"))?;
        }
        None => {
            if history.is_empty() {
                writeln!(out, "No command history.")?;
            } else {
                writeln!(out, "Command history:")?;
                for (i, entry) in history.entries().enumerate() {
                    writeln!(
                        out,
                        "  {:3}  {}  {}",
                        i + 1,
                        style.muted(entry.at.format("%Y-%m-%d %H:%M:%S")),
                        entry.line
                    )?;
                }
            }
        }
    }
    Ok(())
}
