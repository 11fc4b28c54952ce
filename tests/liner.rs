//! Integration tests for automatic line breaking.

mod common;

use common::{assert_legal, tag_pattern};
use rstest::rstest;
use sublines::{Liner, width};

const FOUNTAIN: &str = "The king's child went out into the forest \
                        and sat down by the side of the cool fountain.";

fn liner(text: &str, max_length: usize) -> Liner {
    let mut liner = Liner::new(Some(tag_pattern()));
    liner.set_max_length(max_length);
    liner.set_text(text);
    liner
}

#[test]
fn long_sentences_break_into_two_even_lines() {
    let mut liner = liner(FOUNTAIN, 46);
    let text = liner.break_lines().unwrap();
    assert_eq!(text.split('\n').count(), 2);
    assert_legal(&text, 46);
    // Breaks land on word boundaries only.
    assert_eq!(text.replace('\n', " "), FOUNTAIN);
}

#[test]
fn a_tighter_limit_escalates_to_three_lines() {
    let mut liner = liner(FOUNTAIN, 44);
    let text = liner.break_lines().unwrap();
    assert_eq!(text.split('\n').count(), 3);
    assert_legal(&text, 44);
    assert_eq!(text.replace('\n', " "), FOUNTAIN);
}

#[test]
fn an_unbreakable_word_is_returned_unchanged() {
    let word = "Donaudampfschifffahrtsgesellschaftskapitän";
    let mut liner = liner(word, 20);
    assert_eq!(liner.break_lines().unwrap(), word);
}

#[rstest]
#[case(FOUNTAIN, 40)]
#[case("Given the choice between you and me, they will choose you every time.", 30)]
#[case("- Are you sure? - Quite sure, thank you very much indeed.", 25)]
#[case("No. Not yet. Not ever, I should think.", 16)]
#[case("one tremendously incomprehensible word salad", 12)]
fn every_produced_line_is_legal(#[case] text: &str, #[case] max_length: usize) {
    let mut liner = liner(text, max_length);
    assert_legal(&liner.break_lines().unwrap(), max_length);
}

#[test]
fn dialogue_breaks_prefer_the_dash() {
    let mut liner = liner("- How are you? - Fine, thank you.", 20);
    assert_eq!(
        liner.break_lines().unwrap(),
        "- How are you?\n- Fine, thank you."
    );
}

#[test]
fn tags_survive_rebreaking() {
    let mut liner = liner("<i>aaa bbb ccc ddd</i>", 8);
    assert_eq!(
        liner.break_lines().unwrap(),
        "<i>aaa bbb\nccc ddd</i>"
    );
}

#[test]
fn margins_wrap_every_produced_line() {
    let mut liner = liner("<i>aaa bbb</i>\n<i>ccc ddd</i>", 20);
    assert_eq!(liner.break_lines().unwrap(), "<i>aaa bbb ccc ddd</i>");
}

#[test]
fn rebreaking_collapses_existing_breaks_first() {
    let mut liner = liner("one\ntwo three\nfour", 44);
    assert_eq!(liner.break_lines().unwrap(), "one two three four");
}

#[test]
fn a_display_width_length_func_counts_columns() {
    let mut liner = liner("字幕 字幕 字幕", 5);
    liner.set_length_func(width::display_width);
    assert_eq!(liner.break_lines().unwrap(), "字幕\n字幕\n字幕");
}

#[test]
fn higher_line_budgets_allow_more_lines() {
    let mut liner = liner(FOUNTAIN, 24);
    liner.set_max_lines(4);
    let text = liner.break_lines().unwrap();
    assert!(text.split('\n').count() <= 4);
    assert_legal(&text, 24);
}
