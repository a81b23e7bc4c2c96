//! End-to-end scenarios: source text through parse and render to HTML.

use marq_core::{parse, render_to_string, ParseOptions, RenderOptions};

fn render_default(source: &str) -> String {
    let doc = parse(source, &ParseOptions::default());
    render_to_string(&doc, &RenderOptions::default()).expect("render succeeds")
}

#[test]
fn test_basic_paragraph_with_emphasis() {
    assert_eq!(
        render_default("hello *world* and **bold**"),
        "<p>hello <em>world</em> and <b>bold</b></p>"
    );
}

#[test]
fn test_heading_and_toc() {
    let html = render_default("# A\n\n## B\n\n[[ToC]]");
    assert!(html.contains("<h1 id=\"a\">A</h1>"));
    assert!(html.contains("<h2 id=\"b\">B</h2>"));
    // A single H1 stays at top level; B nests in its sublist.
    assert!(html.contains(
        "<ol><li><a href=\"#a\">A</a><ol><li><a href=\"#b\">B</a></li></ol></li></ol>"
    ));
}

#[test]
fn test_reference_link() {
    let html = render_default("see [site][home]\n\n[home]: https://ex.com \"Home\"");
    assert!(html.contains("<a href=\"https://ex.com\" title=\"Home\">site</a>"));
}

#[test]
fn test_task_list() {
    let html = render_default("- [x] done\n- [ ] todo");
    assert!(html.starts_with("<ul>"));
    assert!(html.contains("<input type=\"checkbox\" checked disabled>done"));
    assert!(html.contains("<input type=\"checkbox\" disabled>todo"));
    assert!(html.ends_with("</ul>"));
}

#[test]
fn test_table_with_alignments() {
    let html = render_default("| A | B | C |\n|:--|:-:|--:|\n| 1 | 2 | 3 |");
    assert!(html.contains("<td style=\"text-align:left\">1</td>"));
    assert!(html.contains("<td style=\"text-align:center\">2</td>"));
    assert!(html.contains("<td style=\"text-align:right\">3</td>"));
}

#[test]
fn test_inline_html_sanitization() {
    let html = render_default("<div onclick=\"x()\">hi<script>bad()</script></div>");
    assert!(html.contains("<div>hi</div>"));
    assert!(!html.contains("script"));
    assert!(!html.contains("onclick"));
}

#[test]
fn test_emphasis_run_of_three() {
    assert_eq!(
        render_default("***a***"),
        "<p><b><em>a</em></b></p>"
    );
}

#[test]
fn test_dollar_amounts_with_latex_enabled() {
    let options = ParseOptions::default().with_latex(true);
    let doc = parse("$5 and $10", &options);
    let html = render_to_string(&doc, &RenderOptions::default()).expect("render succeeds");
    assert_eq!(html, "<p>$5 and $10</p>");
}

#[test]
fn test_empty_input_renders_empty() {
    assert_eq!(render_default(""), "");
}
