//! User command system - registry and dispatch.
//!
//! # Architecture
//!
//! - `command.rs` - the `Handler` trait, execution context and declarations
//! - `registry.rs` - name/alias lookup with conflict rejection
//! - `dispatcher.rs` - one read/resolve/invoke cycle per input line
//! - `builtins/` - commands owned by the host (help, exit, history, plugins)

pub mod builtins;
pub mod command;
pub mod dispatcher;
pub mod registry;

pub use command::{Args, CommandContext, CommandDecl, Handler};
pub use dispatcher::{Dispatcher, Outcome, State};
pub use registry::CommandRegistry;
