//! Stock visible-length functions for the line breaker.
//!
//! Unicode width handling uses the `unicode-width` crate for accurate
//! display calculations; `char_count` is the plain fallback used when no
//! rendering information is available.

use unicode_width::UnicodeWidthStr;

/// Visible length as a count of Unicode scalar values.
#[must_use]
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Visible length in terminal display columns.
#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}
