//! Line-oriented terminal loop.
//!
//! Reads one line at a time from the input, hands it to the dispatcher and
//! prints the prompt again, until the dispatcher terminates or the input
//! ends. Handlers may read from the same terminal themselves; the loop just
//! waits for them.

use std::io::{self, BufRead, Write};

use crate::user::dispatcher::Dispatcher;

/// Where the loop gets its lines from.
///
/// Nothing may stay borrowed between two calls: a handler running in
/// between can read from the same source.
pub trait LineSource {
    /// Append one line to `buf`; `Ok(0)` means end of input.
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl<R: BufRead> LineSource for R {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// Process stdin, locked only for the duration of each read.
pub struct Terminal(io::Stdin);

impl Terminal {
    pub fn stdin() -> Self {
        Self(io::stdin())
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        self.0.read_line(buf)
    }
}

/// Run the read-evaluate loop until `exit`/`quit` or end of input.
pub fn run<L: LineSource, W: Write>(
    dispatcher: &mut Dispatcher<'_>,
    mut input: L,
    mut out: W,
    prompt: &str,
) -> io::Result<()> {
    dispatcher.start();
    writeln!(
        out,
        "{}",
        dispatcher
            .style()
            .muted("Type 'help' for commands, 'exit' to leave.")
    )?;

    let mut line = String::new();
    while !dispatcher.is_terminated() {
        write!(out, "{}", prompt)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            // End of input behaves like `exit`.
            writeln!(out)?;
            debug!("end of input, leaving");
            dispatcher.terminate();
            break;
        }

        dispatcher.dispatch(&line, &mut out)?;
        out.flush()?;
    }
    Ok(())
}
