//! Console module - terminal loop, styling and logging facilities.

pub mod logger;
pub mod style;
pub mod tty;

pub use logger::init as init_logger;
pub use style::{Style, StyleToken};
pub use tty::{LineSource, Terminal};
