//! Integration tests for cursor-driven search and replace.

use rstest::rstest;
use sublines::{Error, Finder};

const TEXT: &str = "One only risks it, because\none's survival depends on it.";

fn finder() -> Finder {
    let mut finder = Finder::new();
    finder.set_text(TEXT);
    finder
}

#[test]
fn forward_literal_search_visits_each_match_then_exhausts() {
    let mut finder = finder();
    finder.set_literal("a");
    assert_eq!(finder.next().unwrap(), (22, 23));
    assert_eq!(finder.next().unwrap(), (39, 40));
    assert!(matches!(finder.next(), Err(Error::Exhausted)));
}

#[test]
fn backward_literal_search_visits_the_same_matches_reversed() {
    let mut finder = finder();
    finder.set_literal("a");
    assert_eq!(finder.previous().unwrap(), (39, 40));
    assert_eq!(finder.previous().unwrap(), (22, 23));
    assert!(matches!(finder.previous(), Err(Error::Exhausted)));
}

#[test]
fn zero_length_regex_matches_advance_without_wrapping() {
    let mut finder = finder();
    finder.set_regex("^").unwrap();
    assert_eq!(finder.next().unwrap(), (0, 0));
    assert_eq!(finder.next().unwrap(), (27, 27));
    assert!(matches!(finder.next(), Err(Error::Exhausted)));
}

#[test]
fn search_resumes_from_the_cursor_after_a_replace() {
    let mut finder = finder();
    finder.set_literal("it");
    finder.set_replacement("that");
    finder.next().unwrap();
    finder.replace(true).unwrap();
    assert_eq!(finder.next().unwrap(), (55, 57));
    finder.replace(true).unwrap();
    assert_eq!(
        finder.text(),
        "One only risks that, because\none's survival depends on that."
    );
}

#[rstest]
#[case::line_starts("^", "- ", 2)]
#[case::line_ends("$", "*", 2)]
#[case::empty_literal_insertion_points("", "|", 57)]
fn zero_length_replace_all_terminates_with_a_stable_count(
    #[case] pattern: &str,
    #[case] replacement: &str,
    #[case] expected: usize,
) {
    let mut first = finder();
    first.set_regex(pattern).unwrap();
    first.set_replacement(replacement);
    assert_eq!(first.replace_all().unwrap(), expected);

    // The same edit on a fresh instance reproduces the same text.
    let mut second = finder();
    second.set_regex(pattern).unwrap();
    second.set_replacement(replacement);
    second.replace_all().unwrap();
    assert_eq!(first.text(), second.text());
}

#[rstest]
#[case::shrinking("one", "1", 1)]
#[case::growing("on", "upon", 3)]
#[case::removal(r"\s+", "", 9)]
fn replace_all_counts_every_substitution(
    #[case] pattern: &str,
    #[case] replacement: &str,
    #[case] expected: usize,
) {
    let mut finder = finder();
    finder.set_regex(pattern).unwrap();
    finder.set_replacement(replacement);
    assert_eq!(finder.replace_all().unwrap(), expected);
}

#[test]
fn backward_regex_replace_expands_where_the_match_was_found() {
    let mut finder = finder();
    finder.set_regex(r"\b").unwrap();
    finder.set_replacement("|");
    assert_eq!(finder.previous().unwrap(), (55, 55));
    // A boundary of the text truncated at the cursor, not of the full text.
    assert_eq!(finder.previous().unwrap(), (54, 54));
    finder.replace(false).unwrap();
    assert_eq!(
        finder.text(),
        "One only risks it, because\none's survival depends on i|t."
    );
}

#[test]
fn backward_regex_replace_expands_group_references() {
    let mut finder = finder();
    finder.set_regex(r"(\w+)\.").unwrap();
    finder.set_replacement("$1!");
    assert_eq!(finder.previous().unwrap(), (53, 56));
    finder.replace(false).unwrap();
    assert_eq!(
        finder.text(),
        "One only risks it, because\none's survival depends on it!"
    );
}

#[test]
fn case_insensitive_search_spans_both_pattern_kinds() {
    let mut finder = finder();
    finder.set_ignore_case(true);
    finder.set_literal("ONE");
    assert_eq!(finder.next().unwrap(), (0, 3));
    assert_eq!(finder.next().unwrap(), (27, 30));
    finder.set_text(TEXT);
    finder.set_regex("^one").unwrap();
    assert_eq!(finder.next().unwrap(), (0, 3));
}

#[test]
fn pattern_and_template_failures_surface_as_errors() {
    let mut finder = finder();
    assert!(matches!(finder.set_regex("(["), Err(Error::Pattern(_))));
    finder.set_regex(r"(\w+)").unwrap();
    finder.set_replacement("${missing}");
    assert!(matches!(finder.replace_all(), Err(Error::Replacement(_))));
}
