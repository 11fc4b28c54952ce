//! Utility helpers shared across integration tests.
#![allow(dead_code)] // not every test crate uses every helper

use regex::Regex;

/// Tag pattern for the HTML-like markup used in these tests.
pub fn tag_pattern() -> Regex {
    Regex::new(r"</?\w+[^<>]*>").expect("tag pattern")
}

/// Remove every tag match, leaving only the visible text.
pub fn strip_tags(text: &str) -> String {
    tag_pattern().replace_all(text, "").into_owned()
}

/// Assert that every line that can still be split fits the limit.
pub fn assert_legal(text: &str, max_length: usize) {
    for line in text.split('\n') {
        assert!(
            !line.contains(' ') || line.chars().count() <= max_length,
            "line {line:?} exceeds {max_length} characters"
        );
    }
}
