//! Logger initialisation for the log crate.

use env_logger::{Builder, Env};

/// Initialize the logger.
///
/// `default_level` applies unless `RUST_LOG` is set. Calling this twice is
/// harmless; the second registration is ignored.
pub fn init(default_level: &str) {
    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
