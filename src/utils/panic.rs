//! Panic containment for plugin code.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

use log::Level;

thread_local! {
    static PROTECTED: Cell<bool> = const { Cell::new(false) };
}

/// Whether the current thread is running inside [`protected`].
pub fn in_protected() -> bool {
    PROTECTED.with(Cell::get)
}

/// Run `f`, turning a panic into `Err(message)`.
///
/// Plugin code is untrusted; nothing it does may unwind into the host.
pub fn protected<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    let outer = PROTECTED.with(|p| p.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    PROTECTED.with(|p| p.set(outer));
    result.map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Route panic reports to the log instead of raw stderr.
///
/// A contained plugin panic is already reported by whoever called
/// [`protected`], so its location only goes to the debug log. Any other
/// panic is about to take the host down and is logged as an error.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| log!(panic_level(), "{}", info)));
}

fn panic_level() -> Level {
    if in_protected() {
        Level::Debug
    } else {
        Level::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_passes_value_through() {
        assert_eq!(protected(|| 41 + 1), Ok(42));
    }

    #[test]
    fn test_protected_captures_str_panic() {
        let result: Result<(), String> = protected(|| panic!("plugin exploded"));
        assert_eq!(result, Err("plugin exploded".to_string()));
    }

    #[test]
    fn test_protected_marks_the_thread() {
        assert!(!in_protected());
        assert_eq!(protected(in_protected), Ok(true));
        assert!(!in_protected());

        let nested = protected(|| {
            let inner: Result<(), String> = protected(|| panic!("inner"));
            (inner.is_err(), in_protected())
        });
        assert_eq!(nested, Ok((true, true)));

        let _: Result<(), String> = protected(|| panic!("gone"));
        assert!(!in_protected());
    }

    #[test]
    fn test_host_panics_log_as_errors() {
        assert_eq!(panic_level(), Level::Error);
        assert_eq!(protected(panic_level), Ok(Level::Debug));
    }

    #[test]
    fn test_protected_captures_formatted_panic() {
        let code = 7;
        let result: Result<(), String> = protected(|| panic!("bad code {}", code));
        assert_eq!(result.unwrap_err(), "bad code 7");
    }
}
