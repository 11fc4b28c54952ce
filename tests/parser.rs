//! Integration tests for tag-preserving search and replace.

mod common;

use common::{strip_tags, tag_pattern};
use rstest::rstest;
use sublines::Parser;

fn parser(text: &str) -> Parser {
    let mut parser = Parser::new(Some(tag_pattern()));
    parser.set_text(text);
    parser
}

#[test]
fn replacing_across_a_tag_keeps_the_tag_in_place() {
    let mut parser =
        parser("<i>One only risks it, <b>because</b>\none's survival depends on it.</i>");
    parser.set_literal("it, be");
    parser.set_replacement("'");
    parser.next().unwrap();
    parser.replace(true).unwrap();
    assert_eq!(
        parser.get_text(),
        "<i>One only risks <b>'cause</b>\none's survival depends on it.</i>"
    );
}

#[test]
fn fully_tagged_lines_round_trip_through_a_no_op_edit() {
    let mut parser = parser("<i>One only risks it,</i>\n<i>because</i>");
    assert_eq!(parser.text(), "One only risks it,\nbecause");
    parser.set_literal("because");
    parser.set_replacement("because");
    assert_eq!(parser.replace_all().unwrap(), 1);
    // Margins keep the per-line pair from multiplying.
    assert_eq!(parser.get_text(), "<i>One only risks it,</i>\n<i>because</i>");
}

#[rstest]
#[case::shrink("<i>One <b>two</b> three</i>", "two", "2")]
#[case::grow("<b>aa</b> aa aa", "aa", "bbbb")]
#[case::delete_tagged_span("a<i>b<b>c</b></i>d", "bc", "")]
#[case::margins("<i>One</i>\n<i>two</i>", "One", "1")]
#[case::delete_everything("<i>One <b>two</b></i>", r".+", "")]
fn edits_never_lose_or_duplicate_tags(
    #[case] tagged: &str,
    #[case] pattern: &str,
    #[case] replacement: &str,
) {
    let mut parser = parser(tagged);
    parser.set_regex(pattern).unwrap();
    parser.set_replacement(replacement);
    parser.replace_all().unwrap();
    // The reassembled text stripped of tags is exactly the working text.
    assert_eq!(strip_tags(&parser.get_text()), parser.text());
}

#[test]
fn repeated_edits_keep_the_mapping_consistent() {
    let mut parser = parser("<i>the <b>quick</b> brown fox</i>");
    for (pattern, replacement) in [
        ("quick", "slow"),
        ("brown", ""),
        (" +", " "),
        ("the", "one very lazy"),
    ] {
        parser.set_regex(pattern).unwrap();
        parser.set_replacement(replacement);
        parser.replace_all().unwrap();
        assert_eq!(strip_tags(&parser.get_text()), parser.text());
    }
    assert_eq!(parser.text(), "one very lazy slow fox");
}

#[test]
fn backward_replace_works_on_stripped_positions() {
    let mut parser = parser("<i>it is it</i>");
    parser.set_literal("it");
    parser.set_replacement("that");
    parser.previous().unwrap();
    parser.replace(false).unwrap();
    assert_eq!(parser.get_text(), "<i>it is that</i>");
}

#[test]
fn search_spans_ignore_the_markup() {
    let mut parser = parser("<i>One <b>two</b> three</i>");
    parser.set_literal("two");
    // "two" starts at visible offset 4; the tags around it do not count.
    assert_eq!(parser.next().unwrap(), (4, 7));
}

#[test]
fn clean_function_runs_after_reassembly() {
    let mut parser = parser("<i>one <b>two</b></i>");
    parser.set_clean(|text| text.replace("<b></b>", ""));
    parser.set_literal("two");
    parser.set_replacement("");
    parser.replace_all().unwrap();
    assert_eq!(parser.get_text(), "<i>one </i>");
}
