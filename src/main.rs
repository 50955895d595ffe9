//! pscli - plugin command host entry point.

use std::io;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use pscli::config::{ColorMode, HostConfig};
use pscli::console::init_logger;
use pscli::console::tty::Terminal;
use pscli::utils::install_panic_hook;
use pscli::Session;

#[derive(Parser, Debug)]
#[command(
    name = "pscli",
    version,
    about = "Interactive host for plugin commands"
)]
struct Cli {
    /// Config file (default: <config dir>/pscli/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plugin directory to search; repeat for several. Replaces the configured list.
    #[arg(short = 'p', long = "plugin-dir")]
    plugin_dirs: Vec<PathBuf>,

    /// Disable terminal colors
    #[arg(long)]
    no_color: bool,

    /// Default log filter (error, warn, info, debug, trace)
    #[arg(long)]
    log: Option<String>,

    /// Run this command line once instead of starting the interactive shell
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let mut config = match HostConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logger("error");
            log::error!("{}", e);
            exit(1);
        }
    };
    if !cli.plugin_dirs.is_empty() {
        config.plugin_dirs = cli.plugin_dirs;
    }
    if cli.no_color {
        config.color = ColorMode::Never;
    }
    if let Some(log) = cli.log {
        config.log = log;
    }

    init_logger(&config.log);
    install_panic_hook();

    let session = Session::build(&config);

    let result = if cli.command.is_empty() {
        session.run_interactive(Terminal::stdin(), io::stdout())
    } else {
        session.run_once(&cli.command.join(" "), io::stdout()).map(|_| ())
    };

    if let Err(e) = result {
        log::error!("terminal: {}", e);
        exit(1);
    }
}
