//! parse -> to_markdown -> parse round-trips.
//!
//! The serialized form is canonical, not byte-identical to the input; the
//! property under test is structural equality of the re-parsed document.

use marq_core::{parse, ParseOptions};

fn assert_round_trip(source: &str, options: &ParseOptions) {
    let doc = parse(source, options);
    let serialized = doc.to_markdown();
    let reparsed = parse(&serialized, options);
    assert_eq!(
        doc, reparsed,
        "serialized form did not re-parse to the same document:\n{serialized}"
    );
}

#[test]
fn test_paragraph_with_emphasis() {
    assert_round_trip("hello *world* and **bold**\n", &ParseOptions::default());
}

#[test]
fn test_headings_and_rule() {
    assert_round_trip("# Title\n\nbody text\n\n---\n\n## Sub ##\n", &ParseOptions::default());
}

#[test]
fn test_nested_list() {
    assert_round_trip("- a\n- b\n    - b1\n    - b2\n- c\n", &ParseOptions::default());
}

#[test]
fn test_ordered_task_list_with_start() {
    assert_round_trip("4. [x] done\n5. [ ] todo\n", &ParseOptions::default());
}

#[test]
fn test_quote_with_heading() {
    assert_round_trip("> # Quoted\n> \n> body\n", &ParseOptions::default());
}

#[test]
fn test_table_with_alignments() {
    assert_round_trip(
        "| A | B | C |\n| :-- | :-: | --: |\n| 1 | 2 | 3 |\n",
        &ParseOptions::default(),
    );
}

#[test]
fn test_code_fence() {
    assert_round_trip("```rust\nfn main() {}\n```\n", &ParseOptions::default());
}

#[test]
fn test_reference_links() {
    assert_round_trip(
        "see [site][home] and ![logo][art]\n\n[art]: /logo.png\n\n[home]: https://ex.com \"Home\"\n",
        &ParseOptions::default(),
    );
}

#[test]
fn test_inline_features() {
    assert_round_trip(
        "~~gone~~ ==kept== ||secret|| __under__ `code` <https://ex.com>\n",
        &ParseOptions::default(),
    );
}

#[test]
fn test_latex_and_emoji() {
    let options = ParseOptions::default()
        .with_latex(true)
        .with_emoji_dictionary(["smile", "wave"]);
    assert_round_trip("inline $x^2$ and :smile: plus :wave::skin-tone-2:\n", &options);
    assert_round_trip("$$\n\\frac{1}{2}\n$$\n", &options);
}

#[test]
fn test_toc_directive() {
    assert_round_trip("# A\n\n[[ToC]]\n\n## B\n", &ParseOptions::default());
}

#[test]
fn test_inline_html_block() {
    assert_round_trip("<div class=\"x\">\nhello\n</div>\n", &ParseOptions::default());
}

#[test]
fn test_hard_linebreak() {
    assert_round_trip("line one  \nline two\n", &ParseOptions::default());
}

#[test]
fn test_empty_document() {
    assert_round_trip("", &ParseOptions::default());
}

#[test]
fn test_parse_is_total_on_malformed_input() {
    // None of these may panic, and all must round-trip.
    let nasty = [
        "**unclosed",
        "[link](",
        "[ref][",
        "`` ` ",
        "| not | a table",
        "~~~",
        "> ",
        "![",
        "$$",
        "\\",
    ];
    for source in nasty {
        assert_round_trip(source, &ParseOptions::default());
    }
}
