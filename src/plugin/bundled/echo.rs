//! Echo plugin - prints arguments back to the console.

use crate::CliResult;
use crate::console::style::Style;
use crate::plugin::bundled::{BundledPlugin, Declarations};
use crate::plugin::metadata::RawMetadata;
use crate::user::command::{CommandContext, CommandDecl};

pub struct EchoPlugin;

impl BundledPlugin for EchoPlugin {
    fn id(&self) -> &str {
        "echo"
    }

    fn metadata(&self) -> RawMetadata {
        RawMetadata::new(
            "pscli",
            "text",
            "general",
            "Echo text back to the console",
        )
    }

    fn declare(&self, decls: &mut Declarations) -> CliResult<()> {
        decls.command(CommandDecl::new("echo", run).alias("e"));
        Ok(())
    }
}

fn run(ctx: &CommandContext<'_>) -> CliResult<()> {
    let words: Vec<&str> = ctx.args().iter().collect();
    println!("{}", render(ctx.invoked_as(), &words, ctx.style));
    Ok(())
}

fn render(invoked_as: &str, words: &[&str], style: &Style) -> String {
    if words.is_empty() {
        style.warning(format!("Usage: {} <text>", invoked_as))
    } else {
        style.success(words.join(" "))
    }
}
