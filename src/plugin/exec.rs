//! Process-backed command handler for manifest units.

use std::path::PathBuf;

use anyhow::Context;

use crate::CliResult;
use crate::user::command::{CommandContext, Handler};

/// Runs `program fixed_args... user_args...` attached to the terminal.
#[derive(Debug, Clone)]
pub struct ExecHandler {
    program: PathBuf,
    fixed_args: Vec<String>,
    dir: PathBuf,
}

impl ExecHandler {
    pub fn new(program: PathBuf, fixed_args: Vec<String>, dir: PathBuf) -> Self {
        Self {
            program,
            fixed_args,
            dir,
        }
    }

    fn argv(&self, user_args: Vec<String>) -> Vec<String> {
        let mut argv = self.fixed_args.clone();
        argv.extend(user_args);
        argv
    }
}

impl Handler for ExecHandler {
    fn call(&self, ctx: &CommandContext<'_>) -> CliResult<()> {
        let argv = self.argv(ctx.args().to_vec());
        debug!(
            "exec {} {:?} (cwd {})",
            self.program.display(),
            argv,
            self.dir.display()
        );
        // An OsStr program keeps PATH lookup for bare names.
        let mut expr = duct::cmd(self.program.as_os_str(), argv).dir(&self.dir);
        if ctx.style.is_plain() {
            expr = expr.env("NO_COLOR", "1");
        }

        // Blocks until the child exits; stdio stays on the terminal.
        expr.run()
            .with_context(|| format!("{} did not complete", self.program.display()))?;
        Ok(())
    }
}
