//! Styling capability handed to plugins.
//!
//! Plugins refer to styles by [`StyleToken`] only. How a token renders is
//! decided by the [`Style`] the host was built with, so tests and dumb
//! terminals can run with [`Style::plain`].

use core::fmt::{self, Display};

/// Stable style identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleToken {
    Success,
    Error,
    Warning,
    Info,
    Emphasis,
    Muted,
    Reset,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCode {
    Reset = 0,
    Bold = 1,
    BrightBlack = 90,
    BrightRed = 91,
    BrightGreen = 92,
    BrightYellow = 93,
    BrightCyan = 96,
}

impl Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\u{1B}[{}m", *self as u8)
    }
}

impl StyleToken {
    fn color(self) -> ColorCode {
        match self {
            StyleToken::Success => ColorCode::BrightGreen,
            StyleToken::Error => ColorCode::BrightRed,
            StyleToken::Warning => ColorCode::BrightYellow,
            StyleToken::Info => ColorCode::BrightCyan,
            StyleToken::Emphasis => ColorCode::Bold,
            StyleToken::Muted => ColorCode::BrightBlack,
            StyleToken::Reset => ColorCode::Reset,
        }
    }
}

/// Read-only style table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    ansi: bool,
}

impl Style {
    /// ANSI escape rendering.
    pub const fn ansi() -> Self {
        Self { ansi: true }
    }

    /// No styling at all; every token renders as the empty string.
    pub const fn plain() -> Self {
        Self { ansi: false }
    }

    pub fn is_plain(&self) -> bool {
        !self.ansi
    }

    /// Escape sequence for a token ("" when plain).
    pub fn code(&self, token: StyleToken) -> String {
        if self.ansi {
            token.color().to_string()
        } else {
            String::new()
        }
    }

    /// Wrap `text` in `token` and a trailing reset.
    pub fn paint(&self, token: StyleToken, text: impl Display) -> String {
        if self.ansi {
            format!("{}{}{}", token.color(), text, ColorCode::Reset)
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, text: impl Display) -> String {
        self.paint(StyleToken::Success, text)
    }

    pub fn error(&self, text: impl Display) -> String {
        self.paint(StyleToken::Error, text)
    }

    pub fn warning(&self, text: impl Display) -> String {
        self.paint(StyleToken::Warning, text)
    }

    pub fn info(&self, text: impl Display) -> String {
        self.paint(StyleToken::Info, text)
    }

    pub fn emphasis(&self, text: impl Display) -> String {
        self.paint(StyleToken::Emphasis, text)
    }

    pub fn muted(&self, text: impl Display) -> String {
        self.paint(StyleToken::Muted, text)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::plain()
    }
}
