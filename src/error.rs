//! Error types shared across the crate.

use thiserror::Error;

/// Errors surfaced by search, replace and line-breaking operations.
#[derive(Debug, Error)]
pub enum Error {
    /// `next` or `previous` found no further match before the cursor hit
    /// the text boundary. Recoverable; iteration does not wrap.
    #[error("no further matches")]
    Exhausted,

    /// An invalid regular expression was given to `set_regex`.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A regex replacement template references a group the pattern does not
    /// define, or contains an unterminated `${...}` reference.
    #[error("invalid replacement template: {0}")]
    Replacement(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
