//! Tag-aware text editing.
//!
//! A [`Parser`] wraps a [`Finder`] and keeps inline markup tags out of its
//! way: `set_text` strips every tag match out of the input while recording
//! where each one sat, searches and replacements run over the plain text,
//! and `get_text` splices the tags back in at positions adjusted for every
//! edit made in between.
//!
//! A multi-line text whose every line is wrapped in the same tag pair is
//! stored as a single (prefix, suffix) margin instead of one record per
//! line, so editing never multiplies the per-line tags.

use regex::Regex;

use crate::error::{Error, Result};
use crate::finder::Finder;
use crate::pattern::{Pattern, RegexOptions};

type CleanFunc = Box<dyn Fn(&str) -> String>;

/// Snapshot of the editable state, for callers that try an edit and roll it
/// back.
#[derive(Clone, Debug)]
pub(crate) struct Checkpoint {
    text: String,
    tags: Vec<(usize, String)>,
}

/// Finder over tag-stripped text that can reassemble the tagged original.
pub struct Parser {
    finder: Finder,
    re_tag: Option<Regex>,
    clean: Option<CleanFunc>,
    /// Tag records as `(position, tag)`, position in the coordinates of the
    /// tagged text, ascending. Reinsertion in this order reproduces the
    /// original layout because each insertion cancels the matching removal.
    tags: Vec<(usize, String)>,
    margins: Option<(String, String)>,
}

impl Parser {
    #[must_use]
    pub fn new(re_tag: Option<Regex>) -> Self {
        Self {
            finder: Finder::new(),
            re_tag,
            clean: None,
            tags: Vec::new(),
            margins: None,
        }
    }

    /// Post-process the reassembled text of [`get_text`](Self::get_text),
    /// e.g. to collapse redundant tag pairs the way a markup codec wants.
    pub fn set_clean(&mut self, clean: impl Fn(&str) -> String + 'static) {
        self.clean = Some(Box::new(clean));
    }

    /// Take a tagged text apart into plain working text plus tag records
    /// (or margins), and reset the search state.
    pub fn set_text(&mut self, text: &str) {
        self.tags.clear();
        self.margins = None;
        let Some(re_tag) = &self.re_tag else {
            self.finder.set_text(text);
            return;
        };
        if text.contains('\n') {
            if let Some((margins, inner)) = detect_margins(re_tag, text) {
                self.margins = Some(margins);
                self.finder.set_text(&inner);
                return;
            }
        }
        let mut plain = String::with_capacity(text.len());
        let mut last = 0;
        for found in re_tag.find_iter(text) {
            self.tags.push((found.start(), found.as_str().to_string()));
            plain.push_str(&text[last..found.start()]);
            last = found.end();
        }
        plain.push_str(&text[last..]);
        self.finder.set_text(&plain);
    }

    /// Reassemble the tagged text from the working text and the stored tag
    /// records or margins. An empty working text has no tags to carry.
    #[must_use]
    pub fn get_text(&self) -> String {
        let mut text = self.finder.text().to_string();
        if !text.is_empty() {
            for (pos, tag) in &self.tags {
                // A tag may outlive the text it sat in; clamping keeps it
                // at the end rather than losing it.
                text.insert_str((*pos).min(text.len()), tag);
            }
            if let Some((prefix, suffix)) = &self.margins {
                text = text
                    .split('\n')
                    .map(|line| format!("{prefix}{line}{suffix}"))
                    .collect::<Vec<_>>()
                    .join("\n");
            }
        }
        match &self.clean {
            Some(clean) => clean(&text),
            None => text,
        }
    }

    /// Replace the current match and reposition tag records around the edit.
    ///
    /// # Errors
    /// Returns [`Error::Replacement`] for a malformed replacement template.
    ///
    /// # Panics
    /// Panics when called without a pattern or without a current match.
    pub fn replace(&mut self, next: bool) -> Result<()> {
        let span = self
            .finder
            .match_span()
            .expect("replace called without a current match");
        let pre_edit = self.finder.text().to_string();
        self.finder.replace(next)?;
        let deleted = span.1 - span.0;
        let inserted = self.finder.text().len() + deleted - pre_edit.len();
        self.shift_tags(span.0, deleted, inserted, &pre_edit);
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
        self.finder.rewind();
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

    /// Move tag records to account for replacing `deleted` characters at
    /// plain-text offset `edit_pos` with `inserted` characters.
    ///
    /// Records are taken to plain-text coordinates (subtracting the lengths
    /// of earlier tags), moved there, and converted back, so tags that end
    /// up sharing a position stack in their original relative order. The
    /// move itself: tags before the edit stay put, tags whose position fell
    /// strictly inside the deleted span collapse onto the edit point, and
    /// tags past the span shift by the edit's net delta. A tag exactly at
    /// the edit point stays before the insertion when the edit lands
    /// mid-word ("opening", the tag belongs to the run that follows) and
    /// lands after it otherwise ("closing", the insertion extends the run
    /// the tag closed).
    fn shift_tags(&mut self, edit_pos: usize, deleted: usize, inserted: usize, pre_edit: &str) {
        if deleted == inserted || self.tags.is_empty() {
            return;
        }
        let opening = pre_edit[edit_pos..]
            .chars()
            .next()
            .is_some_and(|c| !c.is_whitespace());
        let end = edit_pos + deleted;
        let mut plain = Vec::with_capacity(self.tags.len());
        let mut skipped = 0;
        for (pos, tag) in &self.tags {
            plain.push(pos.saturating_sub(skipped));
            skipped += tag.len();
        }
        // Positions stay ascending so reinsertion in record order cannot
        // split an already-reinserted tag.
        let mut floor = 0;
        for pos in &mut plain {
            let moved = if *pos < edit_pos {
                *pos
            } else if *pos == edit_pos {
                if opening { edit_pos } else { edit_pos + inserted }
            } else if *pos < end {
                edit_pos
            } else {
                *pos + inserted - deleted
            };
            *pos = moved.max(floor);
            floor = *pos;
        }
        let mut skipped = 0;
        for ((pos, tag), plain_pos) in self.tags.iter_mut().zip(plain) {
            *pos = plain_pos + skipped;
            skipped += tag.len();
        }
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            text: self.finder.text().to_string(),
            tags: self.tags.clone(),
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.finder.set_text(&checkpoint.text);
        self.tags = checkpoint.tags;
    }

    /// Swap the working text for an equal-length one, leaving tag records
    /// untouched.
    pub(crate) fn swap_text(&mut self, text: String) {
        self.finder.swap_text(text);
    }

    // Finder delegation: the search API is unchanged by tag handling.

    /// See [`Finder::set_literal`].
    pub fn set_literal(&mut self, pattern: &str) {
        self.finder.set_literal(pattern);
    }

    /// See [`Finder::set_regex`].
    ///
    /// # Errors
    /// Returns [`Error::Pattern`] when `pattern` is not a valid regex.
    pub fn set_regex(&mut self, pattern: &str) -> Result<()> {
        self.finder.set_regex(pattern)
    }

    /// See [`Finder::set_regex_with`].
    ///
    /// # Errors
    /// Returns [`Error::Pattern`] when `pattern` is not a valid regex.
    pub fn set_regex_with(&mut self, pattern: &str, options: RegexOptions) -> Result<()> {
        self.finder.set_regex_with(pattern, options)
    }

    /// See [`Finder::set_pattern`].
    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.finder.set_pattern(pattern);
    }

    /// See [`Finder::set_replacement`].
    pub fn set_replacement(&mut self, replacement: &str) {
        self.finder.set_replacement(replacement);
    }

    /// See [`Finder::set_ignore_case`].
    pub fn set_ignore_case(&mut self, ignore_case: bool) {
        self.finder.set_ignore_case(ignore_case);
    }

    /// The tag-stripped working text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.finder.text()
    }

    #[must_use]
    pub fn pos(&self) -> Option<usize> {
        self.finder.pos()
    }

    #[must_use]
    pub fn match_span(&self) -> Option<(usize, usize)> {
        self.finder.match_span()
    }

    /// See [`Finder::next`].
    ///
    /// # Errors
    /// Returns [`Error::Exhausted`] when no match remains after the cursor.
    ///
    /// # Panics
    /// Panics when no pattern has been set.
    pub fn next(&mut self) -> Result<(usize, usize)> {
        self.finder.next()
    }

    /// See [`Finder::previous`].
    ///
    /// # Errors
    /// Returns [`Error::Exhausted`] when no match remains before the cursor.
    ///
    /// # Panics
    /// Panics when no pattern has been set.
    pub fn previous(&mut self) -> Result<(usize, usize)> {
        self.finder.previous()
    }
}

/// Detect a tag pair shared by every line: an identical run of tags opening
/// each line and an identical run closing it, with no other tags in between.
/// Returns the pair and the text with both runs stripped from every line.
fn detect_margins(re_tag: &Regex, text: &str) -> Option<((String, String), String)> {
    let first = text.split('\n').next()?;
    let prefix = leading_tag_run(re_tag, first);
    let suffix = trailing_tag_run(re_tag, &first[prefix.len()..]);
    if prefix.is_empty() && suffix.is_empty() {
        return None;
    }
    let mut inner = Vec::new();
    for line in text.split('\n') {
        let body = line.strip_prefix(&prefix)?.strip_suffix(&suffix)?;
        if re_tag.is_match(body) {
            return None;
        }
        inner.push(body);
    }
    Some(((prefix, suffix), inner.join("\n")))
}

/// The run of adjacent tags at the start of `line`.
fn leading_tag_run(re_tag: &Regex, line: &str) -> String {
    let mut end = 0;
    while let Some(found) = re_tag.find_at(line, end) {
        if found.start() != end {
            break;
        }
        end = found.end();
    }
    line[..end].to_string()
}

/// The run of adjacent tags at the end of `line`.
fn trailing_tag_run(re_tag: &Regex, line: &str) -> String {
    let mut start = line.len();
    loop {
        let Some(found) = re_tag.find_iter(&line[..start]).last() else {
            break;
        };
        if found.end() != start {
            break;
        }
        start = found.start();
    }
    line[start..].to_string()
}
