pub mod panic;

pub use panic::{in_protected, install_panic_hook, protected};
