//! Display width calculation in character cells.

use unicode_width::UnicodeWidthStr;

/// Width calculation method for ambiguous-width characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidthMethod {
    /// POSIX-like wcwidth: ambiguous width = 1.
    #[default]
    WcWidth,
    /// Unicode East Asian Width: ambiguous width = 2.
    Unicode,
}

/// Get the display width of a string in cells (wcwidth rules).
#[must_use]
pub fn display_width(s: &str) -> usize {
    display_width_with_method(s, WidthMethod::WcWidth)
}

/// Get the display width of a string in cells using a specific method.
#[must_use]
pub fn display_width_with_method(s: &str, method: WidthMethod) -> usize {
    match method {
        WidthMethod::WcWidth => UnicodeWidthStr::width(s),
        WidthMethod::Unicode => UnicodeWidthStr::width_cjk(s),
    }
}
