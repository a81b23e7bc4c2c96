//! Pins the table-of-contents level rules (see DESIGN.md).

use marq_core::{parse, render_to_string, ParseOptions, RenderOptions};

fn render_default(source: &str) -> String {
    let doc = parse(source, &ParseOptions::default());
    render_to_string(&doc, &RenderOptions::default()).expect("render succeeds")
}

#[test]
fn test_single_h1_is_top_level() {
    let html = render_default("[[ToC]]\n\n# Only\n\n## Child\n");
    assert!(html.starts_with(
        "<ol><li><a href=\"#only\">Only</a><ol><li><a href=\"#child\">Child</a></li></ol></li></ol>"
    ));
}

#[test]
fn test_multiple_h1s_are_siblings() {
    let html = render_default("[[ToC]]\n\n# One\n\n# Two\n");
    assert!(html.starts_with(
        "<ol><li><a href=\"#one\">One</a></li><li><a href=\"#two\">Two</a></li></ol>"
    ));
}

#[test]
fn test_document_without_h1_promotes_h2() {
    let html = render_default("[[ToC]]\n\n## First\n\n### Sub\n");
    assert!(html.starts_with(
        "<ol><li><a href=\"#first\">First</a><ol><li><a href=\"#sub\">Sub</a></li></ol></li></ol>"
    ));
}

#[test]
fn test_toc_before_headings_still_sees_them() {
    // Heading collection spans the whole document, not just what precedes
    // the directive.
    let html = render_default("[[ToC]]\n\n# Later\n");
    assert!(html.contains("<a href=\"#later\">Later</a>"));
}

#[test]
fn test_toc_with_no_headings_renders_nothing() {
    assert_eq!(render_default("[[ToC]]\n\nplain\n"), "<p>plain</p>");
}

#[test]
fn test_duplicate_heading_ids_permitted() {
    let html = render_default("# Same\n\n# Same\n\n[[ToC]]");
    assert_eq!(html.matches("id=\"same\"").count(), 2);
    assert_eq!(html.matches("href=\"#same\"").count(), 2);
}
