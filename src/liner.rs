//! Automatic line breaking.
//!
//! A [`Liner`] owns a [`Parser`], so every edit it makes while rearranging
//! line breaks keeps inline tags in place. `break_lines` flattens the text
//! to one line and re-breaks it into a small set of lines of even visible
//! length, preferring the positions named by the break-point rules and
//! falling back to plain word boundaries.

use std::sync::LazyLock;

use regex::Regex;

use crate::breakpoints::{BreakPoint, default_break_points};
use crate::error::Result;
use crate::lazy_regex;
use crate::parser::Parser;
use crate::partition;
use crate::pattern::Pattern;
use crate::width;

static SPACE_RUN: LazyLock<Regex> = lazy_regex!(r"\s+", "whitespace run pattern");
static LONE_DASH: LazyLock<Regex> = lazy_regex!("(?m)^-\n", "lone dash line pattern");

/// Hard stop for the escalating trial line-count budget.
const MAX_LINE_COUNT: usize = 49;

const DEFAULT_MAX_LENGTH: usize = 44;
const DEFAULT_MAX_LINES: usize = 2;
const DEFAULT_MAX_DEVIATION: f64 = 0.16;

/// Tag-aware line breaker.
pub struct Liner {
    parser: Parser,
    length_func: Box<dyn Fn(&str) -> usize>,
    break_points: Vec<BreakPoint>,
    max_length: usize,
    max_lines: usize,
    max_deviation: f64,
}

impl Liner {
    #[must_use]
    pub fn new(re_tag: Option<Regex>) -> Self {
        Self {
            parser: Parser::new(re_tag),
            length_func: Box::new(width::char_count),
            break_points: default_break_points(),
            max_length: DEFAULT_MAX_LENGTH,
            max_lines: DEFAULT_MAX_LINES,
            max_deviation: DEFAULT_MAX_DEVIATION,
        }
    }

    /// Hard cap on the visible length of any line.
    pub fn set_max_length(&mut self, max_length: usize) {
        self.max_length = max_length;
    }

    /// Preferred line count; exceeded only when shorter results stay
    /// illegal.
    pub fn set_max_lines(&mut self, max_lines: usize) {
        self.max_lines = max_lines;
    }

    /// Tolerated ratio of line-length standard deviation to `max_length`
    /// for results of three or more lines.
    pub fn set_max_deviation(&mut self, max_deviation: f64) {
        self.max_deviation = max_deviation;
    }

    /// Visible length of a string, e.g. a character count or a
    /// rendering-aware width.
    pub fn set_length_func(&mut self, length_func: impl Fn(&str) -> usize + 'static) {
        self.length_func = Box::new(length_func);
    }

    /// Preferred-break rules, tried in order.
    pub fn set_break_points(&mut self, break_points: Vec<BreakPoint>) {
        self.break_points = break_points;
    }

    /// Set the text to break, trimmed of surrounding whitespace.
    pub fn set_text(&mut self, text: &str) {
        self.parser.set_text(text.trim());
    }

    /// See [`Parser::get_text`].
    #[must_use]
    pub fn get_text(&self) -> String {
        self.parser.get_text()
    }

    /// The tag-stripped working text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.parser.text()
    }

    /// Whether every line that can still be split fits `max_length`. A line
    /// without spaces is a single word; it counts as legal at any length
    /// since breaking it would need hyphenation knowledge.
    #[must_use]
    pub fn is_legal(&self) -> bool {
        self.parser
            .text()
            .split('\n')
            .all(|line| !line.contains(' ') || (self.length_func)(line) <= self.max_length)
    }

    /// Re-break the text into legal, even lines and return it with tags
    /// reassembled.
    ///
    /// Existing breaks are collapsed first. Then, under an escalating line
    /// budget, each break-point rule is tried and kept when its breaks (or
    /// an even merge of its fragments) are legal and not lopsided; when no
    /// rule fits, words become the fragments and are merged evenly. Only a
    /// text whose single word exceeds `max_length` can exhaust the budget;
    /// the last attempt is returned as a best effort.
    ///
    /// # Errors
    /// Returns [`Error::Replacement`](crate::Error::Replacement) when a
    /// break-point rule's replacement references a group its pattern does
    /// not define.
    pub fn break_lines(&mut self) -> Result<String> {
        self.parser.set_pattern(Pattern::Regex(SPACE_RUN.clone()));
        self.parser.set_replacement(" ");
        self.parser.replace_all()?;
        let flat = self.parser.checkpoint();
        for budget in 1..=MAX_LINE_COUNT {
            let rule_budget = budget.max(self.max_lines);
            for index in 0..self.break_points.len() {
                self.parser.restore(flat.clone());
                let rule = self.break_points[index].clone();
                self.parser.set_pattern(Pattern::Regex(rule.regex));
                self.parser.set_replacement(&rule.replacement);
                self.parser.replace_all()?;
                if self.line_count() < 2 {
                    continue;
                }
                if self.line_count() < rule_budget && self.is_legal() && !self.is_deviant() {
                    return Ok(self.parser.get_text());
                }
                self.merge_lines(rule_budget);
                if self.is_legal() && !self.is_deviant() {
                    return Ok(self.parser.get_text());
                }
            }
            self.parser.restore(flat.clone());
            self.break_on_words()?;
            self.merge_lines(budget);
            if self.is_legal() {
                return Ok(self.parser.get_text());
            }
        }
        Ok(self.parser.get_text())
    }

    /// One word per line, except that a lone dialogue dash stays attached
    /// to the word it introduces.
    fn break_on_words(&mut self) -> Result<()> {
        self.parser.set_pattern(Pattern::literal(" ", false));
        self.parser.set_replacement("\n");
        self.parser.replace_all()?;
        self.parser.set_pattern(Pattern::Regex(LONE_DASH.clone()));
        self.parser.set_replacement("- ");
        self.parser.replace_all()?;
        Ok(())
    }

    /// Join the current lines back together with breaks only at the indices
    /// the partition search picks. Line breaks and spaces have the same
    /// length, so tag records need no adjustment.
    fn merge_lines(&mut self, budget: usize) {
        let text = self.parser.text();
        if text.is_empty() {
            return;
        }
        let items: Vec<&str> = text.split('\n').collect();
        let lengths: Vec<usize> = items.iter().map(|item| (self.length_func)(item)).collect();
        let breaks = partition::balanced_breaks(&lengths, budget, self.max_length);
        let mut merged = String::with_capacity(text.len());
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                merged.push(if breaks.contains(&index) { '\n' } else { ' ' });
            }
            merged.push_str(item);
        }
        self.parser.swap_text(merged);
    }

    fn line_count(&self) -> usize {
        self.parser.text().split('\n').count()
    }

    /// A split of three or more lines is deviant when its line lengths
    /// spread too far around their mean relative to `max_length`, even if
    /// every line is legal.
    #[allow(clippy::cast_precision_loss)]
    fn is_deviant(&self) -> bool {
        let lengths: Vec<f64> = self
            .parser
            .text()
            .split('\n')
            .map(|line| (self.length_func)(line) as f64)
            .collect();
        if lengths.len() < 3 {
            return false;
        }
        let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
        let variance =
            lengths.iter().map(|len| (len - mean).powi(2)).sum::<f64>() / lengths.len() as f64;
        variance.sqrt() / self.max_length as f64 > self.max_deviation
    }
}

impl Default for Liner {
    fn default() -> Self {
        Self::new(None)
    }
}
