//! Stateful search and replace over a single text.
//!
//! A [`Finder`] holds one working text, a search cursor and the span of the
//! latest match. `next` and `previous` move the cursor match by match without
//! wrapping; `replace` splices the replacement in at the current match and
//! leaves the cursor past (or before) the edited region so iteration can
//! continue.

use crate::error::{Error, Result};
use crate::pattern::{Pattern, RegexCache, RegexOptions};

/// Literal and regular-expression search with an explicit cursor.
#[derive(Debug, Default)]
pub struct Finder {
    pattern: Option<Pattern>,
    replacement: String,
    ignore_case: bool,
    text: String,
    pos: Option<usize>,
    match_span: Option<(usize, usize)>,
    /// End of the window the current match was found in. Backward searches
    /// match against the text truncated at the cursor, where `$` and `\b`
    /// assert at the cut; expansion must use the same window.
    match_window: Option<usize>,
    cache: RegexCache,
}

impl Finder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the working text and reset the search state.
    ///
    /// The cursor becomes `None`, meaning the next search starts from the
    /// natural end for its direction: the text start for `next`, the text
    /// end for `previous`.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.pos = None;
        self.match_span = None;
        self.match_window = None;
    }

    /// Search for `pattern` as a plain string.
    ///
    /// The current `ignore_case` setting is captured into the pattern;
    /// changing it later requires setting the pattern again.
    pub fn set_literal(&mut self, pattern: &str) {
        self.pattern = Some(Pattern::literal(pattern, self.ignore_case));
    }

    /// Compile `pattern` and search for it as a regular expression, with the
    /// default flags (dot matches newline, `^`/`$` per line).
    ///
    /// # Errors
    /// Returns [`Error::Pattern`] when `pattern` is not a valid regex.
    pub fn set_regex(&mut self, pattern: &str) -> Result<()> {
        self.set_regex_with(pattern, RegexOptions::default())
    }

    /// Compile `pattern` with explicit `options`. `ignore_case` is applied
    /// on top of whatever the options say.
    ///
    /// # Errors
    /// Returns [`Error::Pattern`] when `pattern` is not a valid regex.
    pub fn set_regex_with(&mut self, pattern: &str, options: RegexOptions) -> Result<()> {
        let options = RegexOptions {
            case_insensitive: options.case_insensitive || self.ignore_case,
            ..options
        };
        let regex = self.cache.get_or_compile(pattern, options)?;
        self.pattern = Some(Pattern::Regex(regex));
        Ok(())
    }

    /// Search for an already-built [`Pattern`].
    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.pattern = Some(pattern);
    }

    pub fn set_replacement(&mut self, replacement: &str) {
        self.replacement = replacement.to_string();
    }

    /// Case-fold literal searches and compile subsequent regexes
    /// case-insensitively. Does not touch an already-set pattern.
    pub fn set_ignore_case(&mut self, ignore_case: bool) {
        self.ignore_case = ignore_case;
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn pos(&self) -> Option<usize> {
        self.pos
    }

    #[must_use]
    pub fn match_span(&self) -> Option<(usize, usize)> {
        self.match_span
    }

    /// Advance to the next match at or after the cursor.
    ///
    /// A zero-length match identical to the previous one would stall the
    /// cursor, so it is skipped by stepping one character forward and
    /// searching again; at the text end this counts as exhaustion.
    ///
    /// # Errors
    /// Returns [`Error::Exhausted`] when no match remains after the cursor.
    ///
    /// # Panics
    /// Panics when no pattern has been set.
    pub fn next(&mut self) -> Result<(usize, usize)> {
        let pattern = self.pattern.as_ref().expect("next called without a pattern");
        let mut pos = self.pos.unwrap_or(0);
        loop {
            let Some(span) = pattern.find_forward(&self.text, pos) else {
                return Err(Error::Exhausted);
            };
            if span.0 == span.1 && self.match_span == Some(span) {
                if pos >= self.text.len() {
                    return Err(Error::Exhausted);
                }
                pos = next_boundary(&self.text, pos);
                continue;
            }
            self.pos = Some(span.1);
            self.match_span = Some(span);
            self.match_window = Some(self.text.len());
            return Ok(span);
        }
    }

    /// Move back to the previous match ending at or before the cursor.
    ///
    /// # Errors
    /// Returns [`Error::Exhausted`] when no match remains before the cursor.
    ///
    /// # Panics
    /// Panics when no pattern has been set.
    pub fn previous(&mut self) -> Result<(usize, usize)> {
        let pattern = self
            .pattern
            .as_ref()
            .expect("previous called without a pattern");
        let mut pos = self.pos.unwrap_or(self.text.len());
        loop {
            let Some(span) = pattern.find_backward(&self.text, pos) else {
                return Err(Error::Exhausted);
            };
            if span.0 == span.1 && self.match_span == Some(span) {
                if pos == 0 {
                    return Err(Error::Exhausted);
                }
                pos = prev_boundary(&self.text, pos);
                continue;
            }
            self.pos = Some(span.0);
            self.match_span = Some(span);
            self.match_window = Some(pos);
            return Ok(span);
        }
    }

    /// Replace the current match with the replacement text.
    ///
    /// Regex patterns expand `$n`/`${name}` group references in the
    /// replacement; literal patterns take it verbatim. The cursor lands
    /// after the replaced region when `next` is true, before it otherwise.
    /// A zero-length match keeps a collapsed span at the cursor so the next
    /// search skips over the insertion point instead of stalling on it.
    ///
    /// # Errors
    /// Returns [`Error::Replacement`] for a malformed replacement template.
    ///
    /// # Panics
    /// Panics when called without a pattern or without a current match.
    pub fn replace(&mut self, next: bool) -> Result<()> {
        let span = self
            .match_span
            .expect("replace called without a current match");
        let pattern = self
            .pattern
            .as_ref()
            .expect("replace called without a pattern");
        let window = self.match_window.unwrap_or(self.text.len());
        let replacement = pattern.expand(&self.text[..window], span, &self.replacement)?;
        self.text.replace_range(span.0..span.1, &replacement);
        let pos = if next { span.0 + replacement.len() } else { span.0 };
        self.pos = Some(pos);
        // A second replace without an intervening search is a programming
        // error, except after a zero-length match, where the collapsed span
        // feeds the stall guard.
        self.match_span = (span.0 == span.1).then_some((pos, pos));
        self.match_window = self.match_span.map(|_| self.text.len());
        Ok(())
    }

    /// Replace every match from the start of the text; returns the count.
    ///
    /// # Errors
    /// Returns [`Error::Replacement`] for a malformed replacement template.
    ///
    /// # Panics
    /// Panics when no pattern has been set.
    pub fn replace_all(&mut self) -> Result<usize> {
        self.rewind();
        let mut count = 0;
        loop {
            match self.next() {
                Ok(_) => {
                    self.replace(true)?;
                    count += 1;
                }
                Err(Error::Exhausted) => return Ok(count),
                Err(err) => return Err(err),
            }
        }
    }

    /// Put the cursor back at the text start and forget the current match.
    pub(crate) fn rewind(&mut self) {
        self.pos = Some(0);
        self.match_span = None;
        self.match_window = None;
    }

    /// Swap the working text without resetting the search state. The
    /// replacement must have the same length so that recorded offsets stay
    /// valid.
    pub(crate) fn swap_text(&mut self, text: String) {
        debug_assert_eq!(text.len(), self.text.len());
        self.text = text;
    }
}

/// Byte offset of the character boundary after `pos`.
fn next_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

/// Byte offset of the character boundary before `pos`.
fn prev_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .chars()
        .next_back()
        .map_or(0, |c| pos - c.len_utf8())
}
