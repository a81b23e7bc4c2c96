//! Block pass: a state machine over logical lines.
//!
//! Recognizers run in priority order; the first one that matches a line's
//! opening wins. Paragraph is the fallback, so every line belongs to some
//! block and parsing is total. Reference definitions feed the document's
//! reference table and emit no block.

use crate::ast::{
    Alignment, Block, Document, List, ListEntry, Reference, Table, TableEntry, TableRow,
};
use crate::parser::inline::parse_inlines;
use crate::parser::ParseOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static ATX_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})(?:[ \t]+(.*))?$").expect("heading regex"));

static HORIZONTAL_RULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ {0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$")
        .expect("horizontal rule regex")
});

static REFERENCE_DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\[([^\]]+)\]:[ \t]*(?:<([^>\s]+)>|(\S+))(?:[ \t]+"([^"]*)")?[ \t]*$"#)
        .expect("reference definition regex")
});

static TOC_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[ \t]*\[\[toc\]\][ \t]*$").expect("toc regex"));

static TABLE_DIVIDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\|?(?:[ \t]*:?-+:?[ \t]*\|)*[ \t]*:?-+:?[ \t]*\|?$").expect("divider regex")
});

/// Tags whose start tag opens an inline HTML block.
static BLOCK_HTML_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "address", "article", "aside", "audio", "blockquote", "canvas", "dd", "details", "div",
        "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
        "h5", "h6", "header", "hr", "iframe", "li", "main", "nav", "noembed", "noframes", "ol",
        "p", "pre", "script", "section", "style", "summary", "table", "tbody", "td", "textarea",
        "th", "thead", "tr", "ul", "video",
    ]
    .into_iter()
    .collect()
});

/// Tags that close on their own line (no matching end tag expected).
static SINGLE_LINE_HTML_TAGS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["hr", "br", "img", "input", "meta", "link"].into_iter().collect());

struct ListMarker<'a> {
    indent: usize,
    ordered: bool,
    number: u32,
    content: &'a str,
    content_indent: usize,
}

pub(crate) struct BlockParser<'a> {
    options: &'a ParseOptions,
    document: &'a mut Document,
}

impl<'a> BlockParser<'a> {
    pub(crate) fn new(options: &'a ParseOptions, document: &'a mut Document) -> Self {
        BlockParser { options, document }
    }

    /// Parse top-level lines into the document.
    pub(crate) fn parse_lines(&mut self, lines: &[&str]) {
        let blocks = self.parse_blocks(lines);
        self.document.blocks.extend(blocks);
    }

    fn parse_blocks(&mut self, lines: &[&str]) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            if line.trim().is_empty() {
                i += 1;
                continue;
            }
            if let Some((block, consumed)) = self.try_fenced_code(lines, i) {
                blocks.push(block);
                i += consumed;
            } else if let Some(block) = self.try_heading(line) {
                blocks.push(block);
                i += 1;
            } else if HORIZONTAL_RULE.is_match(line) {
                blocks.push(Block::HorizontalRule);
                i += 1;
            } else if let Some((block, consumed)) = self.try_quote(lines, i) {
                blocks.push(block);
                i += consumed;
            } else if let Some((lists, consumed)) = self.try_list(lines, i) {
                blocks.extend(lists.into_iter().map(Block::List));
                i += consumed;
            } else if let Some((block, consumed)) = self.try_table(lines, i) {
                blocks.push(block);
                i += consumed;
            } else if let Some((block, consumed)) = self.try_display_latex(lines, i) {
                blocks.push(block);
                i += consumed;
            } else if self.try_reference_definition(line) {
                i += 1;
            } else if TOC_DIRECTIVE.is_match(line) {
                blocks.push(Block::TableOfContents);
                i += 1;
            } else if let Some((block, consumed)) = self.try_inline_html(lines, i) {
                blocks.push(block);
                i += consumed;
            } else if let Some((block, consumed)) = self.try_indented_code(lines, i) {
                blocks.push(block);
                i += consumed;
            } else {
                let (block, consumed) = self.parse_paragraph(lines, i);
                blocks.push(block);
                i += consumed;
            }
        }
        blocks
    }

    /// ``` or ~~~ fence; the closer's char must match and its run must be at
    /// least as long. An unclosed fence runs to end of input.
    fn try_fenced_code(&mut self, lines: &[&str], start: usize) -> Option<(Block, usize)> {
        let (fence_char, fence_len, info) = fence_open(lines[start])?;
        let language = info
            .split_whitespace()
            .next()
            .map(str::to_string)
            .filter(|lang| !lang.is_empty());

        let mut body = Vec::new();
        let mut consumed = 1;
        for line in &lines[start + 1..] {
            consumed += 1;
            if fence_close(line, fence_char, fence_len) {
                let code = join_code(&body);
                return Some((Block::Code { language, code }, consumed));
            }
            body.push(*line);
        }
        let code = join_code(&body);
        Some((Block::Code { language, code }, consumed))
    }

    /// ATX heading with an optional trailing `#` run.
    fn try_heading(&mut self, line: &str) -> Option<Block> {
        let captures = ATX_HEADING.captures(line)?;
        let level = captures[1].len() as u8;
        let rest = captures.get(2).map_or("", |m| m.as_str()).trim_end();
        let content = strip_closing_hashes(rest);
        let inlines = parse_inlines(content, self.options);
        Some(Block::heading(level, inlines))
    }

    /// `>`-prefixed lines, recursively parsed. Marker-less non-blank lines
    /// directly after a quoted paragraph line are absorbed (lazy
    /// continuation).
    fn try_quote(&mut self, lines: &[&str], start: usize) -> Option<(Block, usize)> {
        if !lines[start].trim_start().starts_with('>') {
            return None;
        }
        let mut inner: Vec<String> = Vec::new();
        let mut i = start;
        while i < lines.len() {
            let trimmed = lines[i].trim_start();
            if let Some(rest) = trimmed.strip_prefix('>') {
                inner.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
                i += 1;
            } else if !lines[i].trim().is_empty()
                && inner.last().is_some_and(|last| !last.trim().is_empty())
                && !self.interrupts_paragraph(lines, i)
            {
                inner.push(lines[i].to_string());
                i += 1;
            } else {
                break;
            }
        }
        let inner_refs: Vec<&str> = inner.iter().map(String::as_str).collect();
        let children = self.parse_blocks(&inner_refs);
        Some((Block::Quote(children), i - start))
    }

    /// A run of list lines: marker lines plus their continuations, up to a
    /// blank line or a line that opens another block.
    fn try_list(&mut self, lines: &[&str], start: usize) -> Option<(Vec<List>, usize)> {
        list_marker(lines[start])?;
        let mut end = start;
        while end < lines.len() {
            if list_marker(lines[end]).is_none() && self.interrupts_paragraph(lines, end) {
                break;
            }
            end += 1;
        }
        let lists = self.parse_list_group(&lines[start..end]);
        Some((lists, end - start))
    }

    /// Parse a list region. The first marker fixes the base indent; markers
    /// indented to at least the base entry's content indent open sublists.
    /// A marker-type flip at base level starts a new list.
    fn parse_list_group(&mut self, lines: &[&str]) -> Vec<List> {
        let Some(first) = list_marker(lines[0]) else {
            return Vec::new();
        };
        let base_content_indent = first.content_indent;

        let mut lists: Vec<List> = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let Some(marker) = list_marker(lines[i]).filter(|m| m.indent < base_content_indent)
            else {
                // Stray line at base scan level; skip defensively (entry
                // loops below normally consume these).
                i += 1;
                continue;
            };

            let same_kind = lists
                .last()
                .is_some_and(|list| list.ordered == marker.ordered);
            if !same_kind {
                let mut list = List::new(marker.ordered);
                if marker.ordered {
                    list.start = marker.number;
                }
                lists.push(list);
            }

            let mut entry_text: Vec<String> = vec![marker.content.trim_start().to_string()];
            let mut sub_lines: Vec<&str> = Vec::new();
            i += 1;
            while i < lines.len() {
                if let Some(next) = list_marker(lines[i]) {
                    if next.indent < base_content_indent {
                        break;
                    }
                    sub_lines.push(lines[i]);
                } else if sub_lines.is_empty() {
                    // Continuation text of this entry (indented or lazy).
                    entry_text.push(lines[i].trim().to_string());
                } else {
                    sub_lines.push(lines[i]);
                }
                i += 1;
            }

            let (checked, text) = split_checkbox(&entry_text[0]);
            entry_text[0] = text;
            let mut entry = ListEntry::new(parse_inlines(&entry_text.join("\n"), self.options));
            entry.checked = checked;
            if !sub_lines.is_empty() {
                entry.sublists = self.parse_list_group(&sub_lines);
            }
            lists
                .last_mut()
                .expect("a list was opened for this marker")
                .entries
                .push(entry);
        }
        lists
    }

    /// Pipe table: header row immediately followed by an alignment row.
    fn try_table(&mut self, lines: &[&str], start: usize) -> Option<(Block, usize)> {
        if !lines[start].contains('|') {
            return None;
        }
        let divider = lines.get(start + 1)?.trim();
        if !TABLE_DIVIDER.is_match(divider) || !divider.contains('-') {
            return None;
        }

        let header = self.parse_row(lines[start]);
        let alignments: Vec<Alignment> = split_row(divider)
            .iter()
            .map(|cell| {
                let cell = cell.trim();
                match (cell.starts_with(':'), cell.ends_with(':')) {
                    (true, true) => Alignment::Center,
                    (true, false) => Alignment::Left,
                    (false, true) => Alignment::Right,
                    (false, false) => Alignment::None,
                }
            })
            .collect();

        let mut rows = vec![header];
        let mut i = start + 2;
        while i < lines.len() && !lines[i].trim().is_empty() && lines[i].contains('|') {
            rows.push(self.parse_row(lines[i]));
            i += 1;
        }
        Some((Block::Table(Table { rows, alignments }), i - start))
    }

    fn parse_row(&mut self, line: &str) -> TableRow {
        let entries = split_row(line)
            .iter()
            .map(|cell| TableEntry {
                content: parse_inlines(cell, self.options),
            })
            .collect();
        TableRow { entries }
    }

    /// `$$` display LaTeX: either alone on the opening line (content runs
    /// until the closing `$$` or end of input) or a one-line `$$...$$`.
    fn try_display_latex(&mut self, lines: &[&str], start: usize) -> Option<(Block, usize)> {
        if !self.options.latex {
            return None;
        }
        let trimmed = lines[start].trim();
        if trimmed.len() > 4 && trimmed.starts_with("$$") && trimmed.ends_with("$$") {
            let raw = trimmed[2..trimmed.len() - 2].trim().to_string();
            return Some((Block::Latex { raw }, 1));
        }
        if trimmed != "$$" {
            return None;
        }
        let mut body = Vec::new();
        let mut consumed = 1;
        for line in &lines[start + 1..] {
            consumed += 1;
            if line.trim() == "$$" {
                return Some((
                    Block::Latex {
                        raw: body.join("\n"),
                    },
                    consumed,
                ));
            }
            body.push(*line);
        }
        Some((
            Block::Latex {
                raw: body.join("\n"),
            },
            consumed,
        ))
    }

    /// `[name]: <url> "tooltip"` feeds the reference table; emits no block.
    fn try_reference_definition(&mut self, line: &str) -> bool {
        let Some(captures) = REFERENCE_DEFINITION.captures(line) else {
            return false;
        };
        let name = &captures[1];
        let url = captures
            .get(2)
            .or_else(|| captures.get(3))
            .map_or("", |m| m.as_str());
        let tooltip = captures.get(4).map(|m| m.as_str().to_string());
        self.document
            .set_reference(name, Reference::new(url, tooltip));
        true
    }

    /// A line opening with a known block-level tag starts an inline HTML
    /// block, consumed verbatim until the matching close tag or a blank
    /// line. Disallowed tags never open a block, so their lines fall
    /// through to the paragraph recognizer and end up escaped.
    fn try_inline_html(&mut self, lines: &[&str], start: usize) -> Option<(Block, usize)> {
        let tag = html_block_tag(lines[start])?;
        if self.is_disallowed_html_tag(&tag) {
            return None;
        }
        if SINGLE_LINE_HTML_TAGS.contains(tag.as_str()) {
            return Some((Block::InlineHtml(lines[start].trim().to_string()), 1));
        }

        let closing = format!("</{tag}");
        let mut body = Vec::new();
        let mut i = start;
        while i < lines.len() && !lines[i].trim().is_empty() {
            body.push(lines[i]);
            i += 1;
            if body
                .last()
                .is_some_and(|line| line.to_ascii_lowercase().contains(&closing))
            {
                break;
            }
        }
        Some((Block::InlineHtml(body.join("\n")), i - start))
    }

    fn is_disallowed_html_tag(&self, tag: &str) -> bool {
        match &self.options.disallowed_inline_html_tags {
            Some(tags) => tags.iter().any(|t| t.eq_ignore_ascii_case(tag)),
            None => marq_html::SanitizePolicy::default()
                .disallowed_tags
                .contains(tag),
        }
    }

    /// 4-space / tab indented code, only when enabled.
    fn try_indented_code(&mut self, lines: &[&str], start: usize) -> Option<(Block, usize)> {
        if !self.options.code_block_from_indent || !is_indented(lines[start]) {
            return None;
        }
        let mut body = Vec::new();
        let mut i = start;
        while i < lines.len() {
            if is_indented(lines[i]) {
                body.push(dedent(lines[i]));
                i += 1;
            } else if lines[i].trim().is_empty()
                && lines.get(i + 1).copied().is_some_and(is_indented)
            {
                body.push(String::new());
                i += 1;
            } else {
                break;
            }
        }
        let code = join_code(&body.iter().map(String::as_str).collect::<Vec<_>>());
        Some((
            Block::Code {
                language: None,
                code,
            },
            i - start,
        ))
    }

    /// Fallback: consecutive lines accumulate until a blank line or a line
    /// that opens another block.
    fn parse_paragraph(&mut self, lines: &[&str], start: usize) -> (Block, usize) {
        let mut text = vec![lines[start].trim_start()];
        let mut i = start + 1;
        while i < lines.len() && !self.interrupts_paragraph(lines, i) {
            text.push(lines[i].trim_start());
            i += 1;
        }
        let raw = text.join("\n");
        (
            Block::Paragraph(parse_inlines(&raw, self.options)),
            i - start,
        )
    }

    /// Whether the line at `index` ends a paragraph by opening some other
    /// block (or being blank).
    fn interrupts_paragraph(&self, lines: &[&str], index: usize) -> bool {
        let line = lines[index];
        if line.trim().is_empty()
            || ATX_HEADING.is_match(line)
            || fence_open(line).is_some()
            || HORIZONTAL_RULE.is_match(line)
            || line.trim_start().starts_with('>')
            || list_marker(line).is_some()
            || TOC_DIRECTIVE.is_match(line)
            || REFERENCE_DEFINITION.is_match(line)
        {
            return true;
        }
        if self.options.latex && line.trim().starts_with("$$") {
            return true;
        }
        if html_block_tag(line).is_some() {
            return true;
        }
        // A table header is only a header when the next line is a divider.
        if line.contains('|') {
            if let Some(next) = lines.get(index + 1) {
                let next = next.trim();
                if TABLE_DIVIDER.is_match(next) && next.contains('-') {
                    return true;
                }
            }
        }
        false
    }
}

fn fence_open(line: &str) -> Option<(char, usize, &str)> {
    let trimmed = line.trim_start();
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let fence_char = trimmed.chars().next()?;
    if fence_char != '`' && fence_char != '~' {
        return None;
    }
    let fence_len = trimmed.chars().take_while(|&ch| ch == fence_char).count();
    if fence_len < 3 {
        return None;
    }
    let info = trimmed[fence_len..].trim();
    // A backtick in the info string would be ambiguous with an inline span.
    if fence_char == '`' && info.contains('`') {
        return None;
    }
    Some((fence_char, fence_len, info))
}

fn fence_close(line: &str, fence_char: char, fence_len: usize) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.chars().all(|ch| ch == fence_char)
        && trimmed.len() >= fence_len
}

fn join_code(lines: &[&str]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        let mut code = lines.join("\n");
        code.push('\n');
        code
    }
}

fn strip_closing_hashes(content: &str) -> &str {
    let stripped = content.trim_end_matches('#');
    if stripped.is_empty() || stripped.ends_with(' ') || stripped.ends_with('\t') {
        stripped.trim_end()
    } else {
        content
    }
}

/// Indent in columns (tab = 4) and the marker parse for a list line.
fn list_marker(line: &str) -> Option<ListMarker<'_>> {
    let mut indent = 0;
    let mut rest = line;
    for ch in line.chars() {
        match ch {
            ' ' => indent += 1,
            '\t' => indent += 4,
            _ => break,
        }
        rest = &rest[ch.len_utf8()..];
    }

    let first = rest.chars().next()?;
    if matches!(first, '-' | '*' | '+') {
        let content = rest[1..].strip_prefix(' ')?;
        return Some(ListMarker {
            indent,
            ordered: false,
            number: 1,
            content,
            content_indent: indent + 2,
        });
    }

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let after = &rest[digits.len()..];
    let delimiter = after.chars().next()?;
    if delimiter != '.' && delimiter != ')' {
        return None;
    }
    let content = after[1..].strip_prefix(' ')?;
    let number = digits.parse().unwrap_or(1);
    Some(ListMarker {
        indent,
        ordered: true,
        number,
        content,
        content_indent: indent + digits.len() + 2,
    })
}

/// `[ ]`, `[x]` or `[X]` followed by a space (or alone) at the start of an
/// entry's content.
fn split_checkbox(text: &str) -> (Option<bool>, String) {
    for (prefix, checked) in [("[ ]", false), ("[x]", true), ("[X]", true)] {
        if let Some(rest) = text.strip_prefix(prefix) {
            if rest.is_empty() {
                return (Some(checked), String::new());
            }
            if let Some(rest) = rest.strip_prefix(' ') {
                return (Some(checked), rest.to_string());
            }
        }
    }
    (None, text.to_string())
}

fn is_indented(line: &str) -> bool {
    (line.starts_with("    ") || line.starts_with('\t')) && !line.trim().is_empty()
}

fn dedent(line: &str) -> String {
    line.strip_prefix("    ")
        .or_else(|| line.strip_prefix('\t'))
        .unwrap_or(line)
        .to_string()
}

/// Split a table row into raw cells, honoring `\|` escapes.
fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = trimmed.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                current.push(ch);
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            '|' => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            other => current.push(other),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// The lowercased tag name when the line opens with a block-level tag.
fn html_block_tag(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix('<')?;
    let name: String = rest
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric())
        .collect();
    if name.is_empty() {
        return None;
    }
    let name = name.to_ascii_lowercase();
    if BLOCK_HTML_TAGS.contains(name.as_str()) {
        Some(name)
    } else {
        None
    }
}
