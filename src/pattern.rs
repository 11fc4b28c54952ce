//! Search patterns: literal strings and compiled regular expressions.
//!
//! Both kinds report half-open byte spans into the haystack. Byte offsets
//! are always char-boundary aligned, so spans can be spliced directly.

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};

/// Flags applied when compiling a search regex.
///
/// The defaults mirror subtitle-editor search semantics: `.` matches line
/// breaks (subtitle texts are short multi-line blocks) and `^`/`$` anchor
/// per line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegexOptions {
    pub dot_matches_new_line: bool,
    pub multi_line: bool,
    pub case_insensitive: bool,
}

impl Default for RegexOptions {
    fn default() -> Self {
        Self {
            dot_matches_new_line: true,
            multi_line: true,
            case_insensitive: false,
        }
    }
}

/// Compile `pattern` with the given options.
///
/// # Errors
/// Returns [`Error::Pattern`] when `pattern` is not a valid regex.
pub(crate) fn compile(pattern: &str, options: RegexOptions) -> Result<Regex> {
    let regex = RegexBuilder::new(pattern)
        .dot_matches_new_line(options.dot_matches_new_line)
        .multi_line(options.multi_line)
        .case_insensitive(options.case_insensitive)
        .build()?;
    Ok(regex)
}

const CACHE_CAPACITY: usize = 32;

/// Bounded per-instance regex compilation cache.
///
/// The cache is owned by the component that compiles patterns, rather than
/// being a process-wide table, and evicts its oldest entry once full.
#[derive(Debug, Default)]
pub(crate) struct RegexCache {
    entries: Vec<((String, RegexOptions), Regex)>,
}

impl RegexCache {
    pub(crate) fn get_or_compile(&mut self, pattern: &str, options: RegexOptions) -> Result<Regex> {
        let key = (pattern.to_string(), options);
        if let Some((_, regex)) = self.entries.iter().find(|(k, _)| *k == key) {
            return Ok(regex.clone());
        }
        let regex = compile(pattern, options)?;
        if self.entries.len() >= CACHE_CAPACITY {
            self.entries.remove(0);
        }
        self.entries.push((key, regex.clone()));
        Ok(regex)
    }
}

/// A search pattern: a plain string or a compiled regular expression.
///
/// Each variant carries its own search and replacement-expansion behavior.
#[derive(Clone, Debug)]
pub enum Pattern {
    Literal {
        text: String,
        /// Case-folded needle, precomputed for `ignore_case` scans.
        folded: String,
        ignore_case: bool,
    },
    Regex(Regex),
}

impl Pattern {
    #[must_use]
    pub fn literal(text: &str, ignore_case: bool) -> Self {
        Self::Literal {
            text: text.to_string(),
            folded: text.to_lowercase(),
            ignore_case,
        }
    }

    /// First match starting at or after byte offset `from`.
    #[must_use]
    pub(crate) fn find_forward(&self, haystack: &str, from: usize) -> Option<(usize, usize)> {
        match self {
            Self::Literal {
                text,
                folded,
                ignore_case,
            } => {
                if text.is_empty() {
                    return Some((from, from));
                }
                if *ignore_case {
                    find_fold_forward(haystack, from, folded)
                } else {
                    haystack[from..]
                        .find(text.as_str())
                        .map(|i| (from + i, from + i + text.len()))
                }
            }
            Self::Regex(regex) => regex.find_at(haystack, from).map(|m| (m.start(), m.end())),
        }
    }

    /// Last match in the text truncated at byte offset `upto`. Anchors and
    /// boundary assertions see `upto` as the text end.
    #[must_use]
    pub(crate) fn find_backward(&self, haystack: &str, upto: usize) -> Option<(usize, usize)> {
        let window = &haystack[..upto];
        match self {
            Self::Literal {
                text,
                folded,
                ignore_case,
            } => {
                if text.is_empty() {
                    return Some((upto, upto));
                }
                if *ignore_case {
                    find_fold_backward(window, folded)
                } else {
                    window.rfind(text.as_str()).map(|i| (i, i + text.len()))
                }
            }
            Self::Regex(regex) => regex
                .find_iter(window)
                .last()
                .map(|m| (m.start(), m.end())),
        }
    }

    /// Expand `template` against the match at `span`.
    ///
    /// Literal patterns take the template verbatim. Regex patterns expand
    /// `$n`/`${name}` group references after validating them against the
    /// pattern's groups. `haystack` must be the window the match was found
    /// in: a backward search matches against the text truncated at the
    /// cursor, where `$` and `\b` assert at the cut and greedy repetitions
    /// stop short, so captures only re-derive there.
    ///
    /// # Errors
    /// Returns [`Error::Replacement`] for a reference to an undefined group
    /// or an unterminated `${...}`.
    ///
    /// # Panics
    /// Panics when `span` does not correspond to a current match of this
    /// pattern; callers must search before replacing.
    pub(crate) fn expand(
        &self,
        haystack: &str,
        span: (usize, usize),
        template: &str,
    ) -> Result<String> {
        match self {
            Self::Literal { .. } => Ok(template.to_string()),
            Self::Regex(regex) => {
                validate_template(regex, template)?;
                let caps = regex
                    .captures_at(haystack, span.0)
                    .filter(|c| {
                        c.get(0)
                            .is_some_and(|m| m.start() == span.0 && m.end() == span.1)
                    })
                    .expect("replace called without a current match of the pattern");
                let mut out = String::new();
                caps.expand(template, &mut out);
                Ok(out)
            }
        }
    }
}

/// Check every `$` group reference in `template` against `regex`.
fn validate_template(regex: &Regex, template: &str) -> Result<()> {
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        i += 1;
        if i >= bytes.len() {
            // Trailing `$` is a literal dollar sign.
            break;
        }
        if bytes[i] == b'$' {
            i += 1;
            continue;
        }
        let (name, rest) = if bytes[i] == b'{' {
            let Some(close) = template[i..].find('}') else {
                return Err(Error::Replacement(format!(
                    "unterminated group reference in {template:?}"
                )));
            };
            (&template[i + 1..i + close], i + close + 1)
        } else {
            let len = template[i..]
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                .count();
            (&template[i..i + len], i + len)
        };
        if !name.is_empty() {
            validate_group(regex, name, template)?;
        }
        i = rest;
    }
    Ok(())
}

fn validate_group(regex: &Regex, name: &str, template: &str) -> Result<()> {
    if name.bytes().all(|b| b.is_ascii_digit()) {
        let index: usize = name
            .parse()
            .map_err(|_| Error::Replacement(format!("group index {name} out of range")))?;
        if index >= regex.captures_len() {
            return Err(Error::Replacement(format!(
                "pattern has no group {index} referenced in {template:?}"
            )));
        }
    } else if !regex.capture_names().flatten().any(|n| n == name) {
        return Err(Error::Replacement(format!(
            "pattern has no group named {name:?} referenced in {template:?}"
        )));
    }
    Ok(())
}

/// Case-fold scan forwards from `from`; returns the matched haystack span.
fn find_fold_forward(haystack: &str, from: usize, folded: &str) -> Option<(usize, usize)> {
    for (offset, _) in haystack[from..].char_indices() {
        let start = from + offset;
        if let Some(len) = fold_prefix_len(&haystack[start..], folded) {
            return Some((start, start + len));
        }
    }
    None
}

/// Case-fold scan backwards over `window`; returns the rightmost match.
fn find_fold_backward(window: &str, folded: &str) -> Option<(usize, usize)> {
    for (start, _) in window.char_indices().rev() {
        if let Some(len) = fold_prefix_len(&window[start..], folded) {
            return Some((start, start + len));
        }
    }
    None
}

/// Byte length of the prefix of `haystack` whose case-fold equals `folded`,
/// or `None` when the prefix does not match on whole characters.
fn fold_prefix_len(haystack: &str, folded: &str) -> Option<usize> {
    let mut needle = folded.chars();
    let mut want = needle.next()?;
    for (idx, ch) in haystack.char_indices() {
        let mut done = false;
        for low in ch.to_lowercase() {
            if done {
                // The needle ended inside this character's expansion.
                return None;
            }
            if low != want {
                return None;
            }
            match needle.next() {
                Some(next) => want = next,
                None => done = true,
            }
        }
        if done {
            return Some(idx + ch.len_utf8());
        }
    }
    None
}
