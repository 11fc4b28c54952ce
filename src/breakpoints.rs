//! Preferred line-break rules.
//!
//! A break-point rule is a substitution that turns a preferred break
//! position into a line break, e.g. before a dialogue dash or after a
//! sentence. A liner tries the rules in order and keeps the first one whose
//! breaks produce legal, even lines. Real deployments load rules per
//! writing script and language from a pattern repository; the defaults here
//! cover common Latin-script subtitles.

use regex::Regex;

use crate::error::Result;
use crate::pattern::{self, RegexOptions};

/// One preferred-break substitution rule.
#[derive(Clone, Debug)]
pub struct BreakPoint {
    pub(crate) regex: Regex,
    pub(crate) replacement: String,
}

impl BreakPoint {
    /// Compile `pattern` into a rule whose matches are rewritten to
    /// `replacement`. The replacement is expected to introduce a line break
    /// and may use `$n` group references.
    ///
    /// # Errors
    /// Returns [`Error::Pattern`](crate::Error::Pattern) when `pattern` is
    /// not a valid regex.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            regex: pattern::compile(pattern, RegexOptions::default())?,
            replacement: replacement.to_string(),
        })
    }
}

/// The stock rules for Latin-script subtitles, in preference order: break
/// before a dialogue dash, after a sentence, after a clause.
#[must_use]
pub fn default_break_points() -> Vec<BreakPoint> {
    [
        (r" (- )", "\n$1"),
        (r"([.!?…]['\x22”’»]?) ", "$1\n"),
        (r"([,;:]['\x22”’»]?) ", "$1\n"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        BreakPoint::new(pattern, replacement).expect("stock break-point pattern")
    })
    .collect()
}
