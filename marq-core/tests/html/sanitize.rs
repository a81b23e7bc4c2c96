//! Sanitizer properties exercised through the HTML layer.

use marq_html::{parse, sanitize, sanitize_nodes, Element, Node, SanitizePolicy};

fn parse_element(fragment: &str) -> Element {
    let nodes = parse(fragment);
    match nodes.into_iter().next() {
        Some(Node::Element(element)) => element,
        other => panic!("expected an element, got {other:?}"),
    }
}

#[test]
fn test_sanitize_is_idempotent() {
    let mut element = parse_element(
        "<div onclick=\"x()\" class=\"a\"><script>bad()</script><p lang=\"en\">ok</p></div>",
    );
    sanitize(&mut element, &SanitizePolicy::default());
    let once = element.clone();
    sanitize(&mut element, &SanitizePolicy::default());
    assert_eq!(element, once);
}

#[test]
fn test_clean_tree_is_unchanged() {
    let element = parse_element("<div class=\"a\"><p title=\"t\">ok <em>fine</em></p></div>");
    let mut sanitized = element.clone();
    sanitize(&mut sanitized, &SanitizePolicy::default());
    assert_eq!(sanitized, element);
}

#[test]
fn test_default_disallowed_tags_dropped() {
    for tag in ["script", "style", "iframe", "textarea", "title", "svg"] {
        let nodes = parse(&format!("<div><{tag}>payload</{tag}>kept</div>"));
        let survivors = sanitize_nodes(nodes, &SanitizePolicy::default());
        let html: String = survivors
            .iter()
            .map(|node| match node {
                Node::Element(element) => element.outer_html(),
                other => panic!("unexpected node {other:?}"),
            })
            .collect();
        assert_eq!(html, "<div>kept</div>", "tag: {tag}");
    }
}

#[test]
fn test_attribute_policy_per_tag() {
    let mut element = parse_element(
        "<div><img src=\"x.png\" width=\"10\" onerror=\"x()\"><a href=\"/y\" target=\"_blank\">l</a></div>",
    );
    sanitize(&mut element, &SanitizePolicy::default());
    let img = element.children[0].as_element().expect("img kept");
    assert_eq!(img.attr("src").as_deref(), Some("x.png"));
    assert_eq!(img.attr("width").as_deref(), Some("10"));
    assert_eq!(img.attr("onerror"), None);
    let anchor = element.children[1].as_element().expect("a kept");
    assert_eq!(anchor.attr("href").as_deref(), Some("/y"));
    assert_eq!(anchor.attr("target"), None);
}

#[test]
fn test_wildcard_attributes_allowed_everywhere() {
    let mut element = parse_element("<p class=\"x\" id=\"y\" style=\"color:red\" lang=\"en\">t</p>");
    let before = element.clone();
    sanitize(&mut element, &SanitizePolicy::default());
    assert_eq!(element, before);
}

#[test]
fn test_custom_disallowed_tags() {
    let policy = SanitizePolicy::default().with_disallowed_tags(["em"]);
    let mut element = parse_element("<p><em>gone</em><script>kept()</script></p>");
    sanitize(&mut element, &policy);
    let html = element.outer_html();
    assert!(!html.contains("<em>"));
    assert!(html.contains("<script>"));
}

#[test]
fn test_comments_pass_through() {
    let nodes = parse("<!-- keep me -->");
    let survivors = sanitize_nodes(nodes, &SanitizePolicy::default());
    assert_eq!(survivors, vec![Node::Comment(" keep me ".to_string())]);
}
