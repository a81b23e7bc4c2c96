//! Renderer: structural lowering from the document model to an HTML tree.
//!
//! `render` walks the blocks, building [`marq_html`] elements per variant
//! and dispatching to the extension callbacks in the options. Reference
//! links resolve lazily against the document's reference table, so a
//! definition later in the source still applies. Only the LaTeX callback's
//! failure is absorbed (into a fallback element); every other callback
//! error propagates as [`RenderError`].

pub mod options;
mod toc;

use crate::ast::block::{heading_id, Block, List, Table};
use crate::ast::inline::{self, Inline};
use crate::ast::Document;
use crate::error::RenderError;
use marq_html::{sanitize_nodes, Element, Node, SanitizePolicy, Text, TextMode};
pub use options::RenderOptions;

/// Sublist nesting beyond this depth shares the deepest level's semantics.
const MAX_LIST_DEPTH: usize = 3;

/// Lower a document to an HTML element tree.
///
/// The result is the `parent` element from the options (or a fresh
/// `<div>`) with one child per block.
pub fn render(document: &Document, options: &RenderOptions) -> Result<Element, RenderError> {
    let mut root = match &options.parent {
        Some(parent) => parent.clone(),
        None => Element::new("div"),
    };
    for block in &document.blocks {
        render_block(block, document, options, &mut root)?;
    }
    Ok(root)
}

/// Lower a document and serialize the rendered blocks to an HTML string.
pub fn render_to_string(
    document: &Document,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    render(document, options).map(|root| root.inner_html())
}

fn render_block(
    block: &Block,
    document: &Document,
    options: &RenderOptions,
    parent: &mut Element,
) -> Result<(), RenderError> {
    match block {
        Block::Paragraph(content) => {
            let mut paragraph = Element::new("p");
            render_inlines(content, document, options, &mut paragraph)?;
            parent.push(paragraph);
        }
        Block::Heading { level, content } => {
            let mut heading = Element::new(&format!("h{level}"));
            heading.set_attr("id", &heading_id(content));
            render_inlines(content, document, options, &mut heading)?;
            parent.push(heading);
        }
        Block::Code { language, code } => {
            let mut code_element = Element::new("code");
            if let Some(language) = language {
                code_element.add_token("class", &format!("language-{language}"));
            }
            match &options.block_code.highlighter {
                Some(highlighter) => {
                    highlighter(code, language.as_deref(), &mut code_element).map_err(
                        |message| RenderError::Extension {
                            hook: "block_code.highlighter",
                            message,
                        },
                    )?;
                }
                None => {
                    code_element.push_text(code, TextMode::Code);
                }
            }
            let mut pre = Element::new("pre");
            pre.push(code_element);
            if options.block_code.class_name.is_empty() {
                parent.push(pre);
            } else {
                let mut wrapper = Element::new("div");
                wrapper.set_attr("class", &options.block_code.class_name);
                wrapper.push(pre);
                parent.push(wrapper);
            }
        }
        Block::Quote(children) => {
            let mut quote = Element::new("blockquote");
            for child in children {
                render_block(child, document, options, &mut quote)?;
            }
            parent.push(quote);
        }
        Block::HorizontalRule => {
            parent.push(Element::new("hr"));
        }
        Block::List(list) => {
            render_list(list, document, options, parent, 0)?;
        }
        Block::InlineHtml(raw) => {
            if options.inline_html.enable {
                let mut policy = SanitizePolicy::default();
                if let Some(tags) = &options.inline_html.disallowed_tags {
                    policy = policy.with_disallowed_tags(tags);
                }
                for node in sanitize_nodes(marq_html::parse(raw), &policy) {
                    parent.push(node);
                }
            } else {
                let mut paragraph = Element::new("p");
                paragraph.push_text(raw, TextMode::Normal);
                parent.push(paragraph);
            }
        }
        Block::Table(table) => {
            render_table(table, document, options, parent)?;
        }
        Block::TableOfContents => {
            if let Some(list) = toc::build_list(document) {
                render_list(&list, document, options, parent, 0)?;
            }
        }
        Block::Latex { raw } => {
            parent.push(render_latex(raw, true, options));
        }
    }
    Ok(())
}

fn render_inlines(
    content: &[Inline],
    document: &Document,
    options: &RenderOptions,
    parent: &mut Element,
) -> Result<(), RenderError> {
    for node in content {
        render_inline(node, document, options, parent)?;
    }
    Ok(())
}

fn render_inline(
    node: &Inline,
    document: &Document,
    options: &RenderOptions,
    parent: &mut Element,
) -> Result<(), RenderError> {
    match node {
        Inline::Text(content) => {
            parent.push_text(content, TextMode::Normal);
        }
        Inline::Linebreak => {
            parent.push(Element::new("br"));
        }
        Inline::Emoji { id, skin_tone } => match &options.emoji {
            Some(renderer) => {
                let rendered =
                    renderer(id, *skin_tone).map_err(|message| RenderError::Extension {
                        hook: "emoji",
                        message,
                    })?;
                parent.push(rendered);
            }
            None => {
                parent.push_text(&node.to_markdown(), TextMode::Normal);
            }
        },
        Inline::Code(content) => match &options.code.process {
            Some(process) => {
                parent.push(process(content));
            }
            None => {
                let mut code = Element::new("code");
                code.push_text(content, TextMode::Code);
                parent.push(code);
            }
        },
        Inline::Autolink(url) => {
            let mut anchor = Element::new("a");
            anchor.set_attr("href", url);
            anchor.push_text(url, TextMode::Normal);
            parent.push(anchor);
        }
        Inline::Link {
            url,
            content,
            tooltip,
            ref_name,
        } => {
            let mut anchor = Element::new("a");
            let (href, title) = resolve_link(url, tooltip, ref_name, document);
            if let Some(href) = href {
                anchor.set_attr("href", &href);
            }
            if let Some(title) = title {
                anchor.set_attr("title", &title);
            }
            render_inlines(content, document, options, &mut anchor)?;
            parent.push(anchor);
        }
        Inline::Image { .. } => {
            parent.push(render_image(node, document, options));
        }
        Inline::Italic(content) => {
            let mut em = Element::new("em");
            render_inlines(content, document, options, &mut em)?;
            parent.push(em);
        }
        Inline::Bold(content) => {
            let mut bold = Element::new("b");
            render_inlines(content, document, options, &mut bold)?;
            parent.push(bold);
        }
        Inline::Underline(content) => {
            let mut element = if options.underline.enable {
                let mut u = Element::new("u");
                if !options.underline.class_name.is_empty() {
                    u.set_attr("class", &options.underline.class_name);
                }
                u
            } else {
                Element::new("b")
            };
            render_inlines(content, document, options, &mut element)?;
            parent.push(element);
        }
        Inline::Strikethrough(content) => {
            let mut span = Element::new("span");
            if !options.strikethrough.class_name.is_empty() {
                span.set_attr("class", &options.strikethrough.class_name);
            }
            render_inlines(content, document, options, &mut span)?;
            parent.push(span);
        }
        Inline::Highlight(content) => {
            if options.highlight.enable {
                let mut mark = Element::new("mark");
                render_inlines(content, document, options, &mut mark)?;
                parent.push(mark);
            } else {
                let literal = format!("=={}==", inline::to_markdown(content));
                parent.push_text(&literal, TextMode::Normal);
            }
        }
        Inline::Spoiler(content) => {
            render_spoiler(content, document, options, parent)?;
        }
        Inline::Latex { raw, display } => {
            parent.push(render_latex(raw, *display, options));
        }
        Inline::Comment(content) => {
            parent.push(Node::Comment(content.clone()));
        }
    }
    Ok(())
}

/// Resolve a link's target: inline links carry their own url/tooltip,
/// referenced links look the name up in the document's table. A missing
/// reference yields no `href` at all; the visible text is preserved.
fn resolve_link(
    url: &str,
    tooltip: &Option<String>,
    ref_name: &str,
    document: &Document,
) -> (Option<String>, Option<String>) {
    if ref_name.is_empty() {
        (Some(url.to_string()), tooltip.clone())
    } else {
        match document.reference(ref_name) {
            Some(reference) => (Some(reference.url.clone()), reference.tooltip.clone()),
            None => (None, None),
        }
    }
}

fn render_image(node: &Inline, document: &Document, options: &RenderOptions) -> Element {
    let Inline::Image {
        url,
        content,
        tooltip,
        ref_name,
    } = node
    else {
        unreachable!("render_image is only called with images");
    };
    let mut img = Element::new("img");
    let (src, title) = resolve_link(url, tooltip, ref_name, document);
    if let Some(src) = src {
        img.set_attr("src", &src);
    }
    let alt = inline::plain_text(content);
    if !alt.is_empty() {
        img.set_attr("alt", &alt);
    }
    if let Some(title) = title {
        img.set_attr("title", &title);
    }
    if !options.image.class_name.is_empty() {
        img.set_attr("class", &options.image.class_name);
    }
    img
}

/// A spoiler whose sole child is an image gets the image-spoiler shape: a
/// wrapping `<div>` whose hidden class gates reveal. Text spoilers are a
/// classed `<span>`; disabled spoilers emit their literal `||...||` form.
fn render_spoiler(
    content: &[Inline],
    document: &Document,
    options: &RenderOptions,
    parent: &mut Element,
) -> Result<(), RenderError> {
    if !options.spoiler.enable {
        let mut span = Element::new("span");
        let literal = format!("||{}||", inline::to_markdown(content));
        span.push_text(&literal, TextMode::Normal);
        parent.push(span);
        return Ok(());
    }
    if let [image @ Inline::Image { .. }] = content {
        let mut wrapper = Element::new("div");
        wrapper.add_token("class", &options.spoiler.image_class_name);
        wrapper.add_token("class", &options.spoiler.hidden_class_name);
        wrapper.push(render_image(image, document, options));
        parent.push(wrapper);
        return Ok(());
    }
    let mut span = Element::new("span");
    if !options.spoiler.class_name.is_empty() {
        span.set_attr("class", &options.spoiler.class_name);
    }
    render_inlines(content, document, options, &mut span)?;
    parent.push(span);
    Ok(())
}

/// Without a LaTeX renderer the raw source passes through (delimiters
/// included) so client-side typesetting can still find it. A failing
/// renderer produces the fallback element instead of an error.
fn render_latex(raw: &str, display: bool, options: &RenderOptions) -> Node {
    match &options.latex.render {
        Some(renderer) => match renderer(raw, display) {
            Ok(html) => Node::Text(Text::with_mode(&html, TextMode::Raw)),
            Err(_) => {
                let mut fallback = Element::new("span");
                for class in &options.latex.error_classes {
                    fallback.add_token("class", class);
                }
                fallback.push_text(raw, TextMode::Normal);
                Node::Element(fallback)
            }
        },
        None => {
            let literal = if display {
                format!("$${raw}$$")
            } else {
                format!("${raw}$")
            };
            Node::Text(Text::new(&literal))
        }
    }
}

fn render_list(
    list: &List,
    document: &Document,
    options: &RenderOptions,
    parent: &mut Element,
    depth: usize,
) -> Result<(), RenderError> {
    let mut element = Element::new(if list.ordered { "ol" } else { "ul" });
    if list.ordered && list.start != 1 {
        element.set_attr("start", &list.start.to_string());
    }
    for entry in &list.entries {
        let mut item = Element::new("li");
        if let Some(checked) = entry.checked {
            if options.checkbox.enable {
                let mut checkbox = Element::new("input");
                checkbox.set_attr("type", "checkbox");
                if checked {
                    checkbox.set_attr("checked", "");
                }
                if options.checkbox.disabled {
                    checkbox.set_attr("disabled", "");
                }
                item.push(checkbox);
                item.set_style("list-style-type", "none");
            }
        }
        render_inlines(&entry.content, document, options, &mut item)?;
        for sublist in &entry.sublists {
            // Deeper nesting still renders, but shares depth-3 semantics.
            let next_depth = (depth + 1).min(MAX_LIST_DEPTH);
            render_list(sublist, document, options, &mut item, next_depth)?;
        }
        element.push(item);
    }
    parent.push(element);
    Ok(())
}

fn render_table(
    table: &Table,
    document: &Document,
    options: &RenderOptions,
    parent: &mut Element,
) -> Result<(), RenderError> {
    let mut element = Element::new("table");
    element.set_attr("role", "table");

    let mut rows = table.rows.iter();
    if let Some(header) = rows.next() {
        let mut thead = Element::new("thead");
        let mut tr = Element::new("tr");
        for (column, entry) in header.entries.iter().enumerate() {
            let mut th = Element::new("th");
            if let Some(css) = table.alignment(column).css() {
                th.set_style("text-align", css);
            }
            render_inlines(&entry.content, document, options, &mut th)?;
            tr.push(th);
        }
        thead.push(tr);
        element.push(thead);
    }

    let mut tbody = Element::new("tbody");
    for row in rows {
        let mut tr = Element::new("tr");
        for (column, entry) in row.entries.iter().enumerate() {
            let mut td = Element::new("td");
            if let Some(css) = table.alignment(column).css() {
                td.set_style("text-align", css);
            }
            render_inlines(&entry.content, document, options, &mut td)?;
            tr.push(td);
        }
        tbody.push(tr);
    }
    element.push(tbody);

    if let Some(process) = &options.table.process {
        process(&mut element).map_err(|message| RenderError::Extension {
            hook: "table.process",
            message,
        })?;
    }
    parent.push(element);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseOptions};

    fn render_default(source: &str) -> String {
        let doc = parse(source, &ParseOptions::default());
        render_to_string(&doc, &RenderOptions::default()).expect("render succeeds")
    }

    #[test]
    fn test_paragraph_with_emphasis() {
        assert_eq!(
            render_default("hello *world* and **bold**"),
            "<p>hello <em>world</em> and <b>bold</b></p>"
        );
    }

    #[test]
    fn test_heading_gets_id() {
        assert_eq!(render_default("## Hello World"), "<h2 id=\"hello-world\">Hello World</h2>");
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            render_default("```rust\nlet x = 1;\n```"),
            "<pre><code class=\"language-rust\">let x = 1;\n</code></pre>"
        );
    }

    #[test]
    fn test_code_block_wrapper_class() {
        let doc = parse("```\nx\n```", &ParseOptions::default());
        let mut options = RenderOptions::default();
        options.block_code.class_name = "block-code".to_string();
        let html = render_to_string(&doc, &options).expect("render succeeds");
        assert_eq!(
            html,
            "<div class=\"block-code\"><pre><code>x\n</code></pre></div>"
        );
    }

    #[test]
    fn test_code_text_keeps_ampersand() {
        assert_eq!(
            render_default("`a & b < c`"),
            "<p><code>a & b &lt; c</code></p>"
        );
    }

    #[test]
    fn test_task_list() {
        let html = render_default("- [x] done\n- [ ] todo");
        assert!(html.starts_with("<ul><li"));
        assert!(html.contains("<input type=\"checkbox\" checked disabled>done"));
        assert!(html.contains("<input type=\"checkbox\" disabled>todo"));
    }

    #[test]
    fn test_checkbox_disabled_option() {
        let doc = parse("- [x] a", &ParseOptions::default());
        let mut options = RenderOptions::default();
        options.checkbox.enable = false;
        let html = render_to_string(&doc, &options).expect("render succeeds");
        assert!(!html.contains("input"));
        assert!(html.contains("<li>a</li>"));
    }

    #[test]
    fn test_ordered_list_start_attribute() {
        let html = render_default("3. c\n4. d");
        assert!(html.starts_with("<ol start=\"3\">"));
    }

    #[test]
    fn test_table_alignment_styles() {
        let html = render_default("| A | B | C |\n|:--|:-:|--:|\n| 1 | 2 | 3 |");
        assert!(html.contains("<table role=\"table\">"));
        assert!(html.contains("<td style=\"text-align:left\">1</td>"));
        assert!(html.contains("<td style=\"text-align:center\">2</td>"));
        assert!(html.contains("<td style=\"text-align:right\">3</td>"));
    }

    #[test]
    fn test_reference_link_resolves_late_definition() {
        let html = render_default("see [site][home]\n\n[home]: https://ex.com \"Home\"");
        assert!(html.contains("<a href=\"https://ex.com\" title=\"Home\">site</a>"));
    }

    #[test]
    fn test_unresolved_reference_keeps_text() {
        let html = render_default("see [site][nowhere]");
        assert!(html.contains("<a>site</a>"));
    }

    #[test]
    fn test_inline_html_sanitized() {
        let html = render_default("<div onclick=\"x()\">hi<script>bad()</script></div>");
        assert!(html.contains("<div>hi</div>"));
        assert!(!html.contains("script"));
        assert!(!html.contains("onclick"));
    }

    #[test]
    fn test_inline_html_disabled_is_escaped() {
        let doc = parse("<div>hi</div>", &ParseOptions::default());
        let mut options = RenderOptions::default();
        options.inline_html.enable = false;
        let html = render_to_string(&doc, &options).expect("render succeeds");
        assert_eq!(html, "<p>&lt;div&gt;hi&lt;/div&gt;</p>");
    }

    #[test]
    fn test_toc_renders_nested_ol() {
        let html = render_default("# A\n\n## B\n\n[[ToC]]");
        assert!(html.contains(
            "<ol><li><a href=\"#a\">A</a><ol><li><a href=\"#b\">B</a></li></ol></li></ol>"
        ));
    }

    #[test]
    fn test_spoiler_variants() {
        let html = render_default("||secret||");
        assert_eq!(html, "<p><span class=\"spoiler\">secret</span></p>");

        let html = render_default("||![alt](x.png)||");
        assert_eq!(
            html,
            "<p><div class=\"spoiler-image spoiler-hidden\"><img src=\"x.png\" alt=\"alt\"></div></p>"
        );
    }

    #[test]
    fn test_spoiler_disabled_literal() {
        let doc = parse("||secret||", &ParseOptions::default());
        let mut options = RenderOptions::default();
        options.spoiler.enable = false;
        let html = render_to_string(&doc, &options).expect("render succeeds");
        assert_eq!(html, "<p><span>||secret||</span></p>");
    }

    #[test]
    fn test_highlight_disabled_literal() {
        let doc = parse("==note==", &ParseOptions::default());
        let mut options = RenderOptions::default();
        options.highlight.enable = false;
        let html = render_to_string(&doc, &options).expect("render succeeds");
        assert_eq!(html, "<p>==note==</p>");
    }

    #[test]
    fn test_underline_disabled_renders_bold() {
        let doc = parse("__u__", &ParseOptions::default());
        let mut options = RenderOptions::default();
        options.underline.enable = false;
        let html = render_to_string(&doc, &options).expect("render succeeds");
        assert_eq!(html, "<p><b>u</b></p>");
    }

    #[test]
    fn test_emoji_without_renderer_is_literal() {
        let parse_options = ParseOptions::default().with_emoji_dictionary(["smile"]);
        let doc = parse(":smile:", &parse_options);
        let html = render_to_string(&doc, &RenderOptions::default()).expect("render succeeds");
        assert_eq!(html, "<p>:smile:</p>");
    }

    #[test]
    fn test_emoji_renderer_invoked() {
        let parse_options = ParseOptions::default().with_emoji_dictionary(["smile"]);
        let doc = parse(":smile:", &parse_options);
        let options = RenderOptions::default().with_emoji_renderer(Box::new(|id, _tone| {
            let mut img = Element::new("img");
            img.set_attr("src", &format!("/emoji/{id}.png"));
            Ok(Node::Element(img))
        }));
        let html = render_to_string(&doc, &options).expect("render succeeds");
        assert_eq!(html, "<p><img src=\"/emoji/smile.png\"></p>");
    }

    #[test]
    fn test_latex_without_renderer_passes_through() {
        let parse_options = ParseOptions::default().with_latex(true);
        let doc = parse("$x^2$", &parse_options);
        let html = render_to_string(&doc, &RenderOptions::default()).expect("render succeeds");
        assert_eq!(html, "<p>$x^2$</p>");
    }

    #[test]
    fn test_latex_renderer_error_falls_back() {
        let parse_options = ParseOptions::default().with_latex(true);
        let doc = parse("$\\bad{$", &parse_options);
        let options = RenderOptions::default()
            .with_latex_renderer(Box::new(|_raw, _display| Err("broken".to_string())));
        let html = render_to_string(&doc, &options).expect("latex failure is absorbed");
        assert!(html.contains("class=\"latex-error\""));
    }

    #[test]
    fn test_highlighter_error_propagates() {
        let doc = parse("```\nx\n```", &ParseOptions::default());
        let options = RenderOptions::default()
            .with_block_code_highlighter(Box::new(|_code, _lang, _parent| {
                Err("no grammar".to_string())
            }));
        let err = render_to_string(&doc, &options).unwrap_err();
        assert_eq!(
            err,
            RenderError::Extension {
                hook: "block_code.highlighter",
                message: "no grammar".to_string(),
            }
        );
    }

    #[test]
    fn test_parent_option() {
        let doc = parse("text", &ParseOptions::default());
        let mut parent = Element::new("article");
        parent.set_attr("class", "post");
        let options = RenderOptions::default().with_parent(parent);
        let root = render(&doc, &options).expect("render succeeds");
        assert_eq!(
            root.outer_html(),
            "<article class=\"post\"><p>text</p></article>"
        );
    }

    #[test]
    fn test_empty_document_renders_empty_root() {
        let doc = parse("", &ParseOptions::default());
        let root = render(&doc, &RenderOptions::default()).expect("render succeeds");
        assert_eq!(root.outer_html(), "<div></div>");
    }
}
