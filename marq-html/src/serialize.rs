//! Serialization: escaping rules and compact/pretty emit.
//!
//! Escaping depends on the text node's mode:
//! - `Normal`: `&` -> `&amp;`, `<` -> `&lt;`, `>` -> `&gt;`
//! - `Code`: `<` and `>` only (ampersands pass through)
//! - `Raw`: untouched
//!
//! Attribute values escape `&` and `"`. Void tags emit no closing tag and no
//! children. Subtrees under whitespace-preserving tags (`pre`, `code`) are
//! always emitted compactly, even from the pretty printer.

use crate::node::{Element, Node, TextMode};
use std::fmt::Write;

/// Escape text content for the given mode.
pub fn escape_text(content: &str, mode: TextMode) -> String {
    match mode {
        TextMode::Raw => content.to_string(),
        TextMode::Normal => {
            let mut escaped = String::with_capacity(content.len());
            for ch in content.chars() {
                match ch {
                    '&' => escaped.push_str("&amp;"),
                    '<' => escaped.push_str("&lt;"),
                    '>' => escaped.push_str("&gt;"),
                    other => escaped.push(other),
                }
            }
            escaped
        }
        TextMode::Code => {
            let mut escaped = String::with_capacity(content.len());
            for ch in content.chars() {
                match ch {
                    '<' => escaped.push_str("&lt;"),
                    '>' => escaped.push_str("&gt;"),
                    other => escaped.push(other),
                }
            }
            escaped
        }
    }
}

/// Escape an attribute value. `&` must go first so `&quot;` survives.
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Serialize a node compactly.
pub fn node_to_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Serialize an element's children compactly.
pub fn inner_html(element: &Element) -> String {
    let mut out = String::new();
    for child in &element.children {
        write_node(child, &mut out);
    }
    out
}

/// Serialize an element including its own tag, compactly.
pub fn outer_html(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

/// Serialize an element with two-space indentation.
///
/// Whitespace-preserving subtrees are emitted compactly so their content is
/// not disturbed by indentation.
pub fn outer_html_pretty(element: &Element) -> String {
    let mut out = String::new();
    write_element_pretty(element, 0, &mut out);
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(element) => write_element(element, out),
        Node::Text(text) => out.push_str(&escape_text(&text.content, text.mode)),
        Node::Comment(content) => {
            let _ = write!(out, "<!--{content}-->");
        }
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag.name);
    write_attributes(element, out);
    out.push('>');
    if element.tag.self_closing {
        return;
    }
    for child in &element.children {
        write_node(child, out);
    }
    let _ = write!(out, "</{}>", element.tag.name);
}

fn write_attributes(element: &Element, out: &mut String) {
    for attribute in &element.attributes {
        let value = attribute.value.to_value_string();
        if value.is_empty() {
            // Boolean attribute (checked, disabled, ...).
            let _ = write!(out, " {}", attribute.name);
        } else {
            let _ = write!(out, " {}=\"{}\"", attribute.name, escape_attribute(&value));
        }
    }
}

fn write_element_pretty(element: &Element, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    if element.tag.preserve_whitespace {
        out.push_str(&indent);
        write_element(element, out);
        out.push('\n');
        return;
    }
    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.tag.name);
    write_attributes(element, out);
    out.push('>');
    if element.tag.self_closing {
        out.push('\n');
        return;
    }
    let only_text = element
        .children
        .iter()
        .all(|child| matches!(child, Node::Text(_)));
    if only_text {
        for child in &element.children {
            write_node(child, out);
        }
    } else {
        out.push('\n');
        for child in &element.children {
            match child {
                Node::Element(child_element) => {
                    write_element_pretty(child_element, depth + 1, out);
                }
                other => {
                    out.push_str(&"  ".repeat(depth + 1));
                    write_node(other, out);
                    out.push('\n');
                }
            }
        }
        out.push_str(&indent);
    }
    let _ = write!(out, "</{}>", element.tag.name);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Element, TextMode};

    #[test]
    fn test_normal_escaping() {
        assert_eq!(
            escape_text("a & b < c > d", TextMode::Normal),
            "a &amp; b &lt; c &gt; d"
        );
    }

    #[test]
    fn test_code_mode_keeps_ampersands() {
        assert_eq!(
            escape_text("&amp; <tag>", TextMode::Code),
            "&amp; &lt;tag&gt;"
        );
    }

    #[test]
    fn test_raw_mode_passthrough() {
        assert_eq!(escape_text("<b>&</b>", TextMode::Raw), "<b>&</b>");
    }

    #[test]
    fn test_attribute_escaping_order() {
        assert_eq!(escape_attribute(r#"a "b" & c"#), "a &quot;b&quot; &amp; c");
    }

    #[test]
    fn test_outer_html() {
        let mut p = Element::new("p");
        p.push("hello ");
        let mut em = Element::new("em");
        em.push("world");
        p.push(em);
        assert_eq!(p.outer_html(), "<p>hello <em>world</em></p>");
    }

    #[test]
    fn test_void_tag_emit() {
        let mut img = Element::new("img");
        img.set_attr("src", "x.png");
        img.set_attr("alt", "x");
        assert_eq!(img.outer_html(), r#"<img src="x.png" alt="x">"#);
    }

    #[test]
    fn test_boolean_attribute_emit() {
        let mut input = Element::new("input");
        input.set_attr("type", "checkbox");
        input.set_attr("checked", "");
        input.set_attr("disabled", "");
        assert_eq!(
            input.outer_html(),
            r#"<input type="checkbox" checked disabled>"#
        );
    }

    #[test]
    fn test_code_text_mode_in_code_element() {
        let mut code = Element::new("code");
        code.push_text("x &lt; y", TextMode::Code);
        assert_eq!(code.outer_html(), "<code>x &lt; y</code>");
    }

    #[test]
    fn test_comment_emit() {
        let mut div = Element::new("div");
        div.push(crate::node::Node::Comment(" note ".to_string()));
        assert_eq!(div.outer_html(), "<div><!-- note --></div>");
    }

    #[test]
    fn test_pretty_preserves_pre() {
        let mut pre = Element::new("pre");
        let mut code = Element::new("code");
        code.push_text("fn main() {\n}\n", TextMode::Code);
        pre.push(code);
        let mut div = Element::new("div");
        div.push(pre);
        let pretty = outer_html_pretty(&div);
        assert!(pretty.contains("<pre><code>fn main() {\n}\n</code></pre>"));
    }
}
