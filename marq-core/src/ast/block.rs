//! Block AST nodes.
//!
//! Blocks occupy whole lines and cannot nest inside a paragraph. Rows and
//! cells do not know their table: column alignment is owned by [`Table`]
//! and passed down as a parameter wherever it is needed.

use crate::ast::inline::{self, strip_linebreaks, Inline};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Escape set equivalent to JavaScript's `encodeURI`: everything except
/// alphanumerics and `; , / ? : @ & = + $ - _ . ! ~ * ' ( ) #`.
const ENCODE_URI: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Block node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    /// ATX heading; level is 1..=6 and content holds no linebreaks.
    Heading { level: u8, content: Vec<Inline> },
    /// Fenced (or indented) code block; content is verbatim.
    Code {
        language: Option<String>,
        code: String,
    },
    Quote(Vec<Block>),
    HorizontalRule,
    List(List),
    /// Raw inline HTML fragment captured by the block pass. Parsed and
    /// sanitized at render time.
    InlineHtml(String),
    Table(Table),
    /// `[[ToC]]` directive marker; expanded to a list by the renderer.
    TableOfContents,
    /// Display-mode LaTeX (`$$` fenced).
    Latex { raw: String },
}

impl Block {
    /// Build a heading, clamping the level into 1..=6 and dropping
    /// linebreaks from the content.
    pub fn heading(level: u8, content: Vec<Inline>) -> Self {
        Block::Heading {
            level: level.clamp(1, 6),
            content: strip_linebreaks(content),
        }
    }

    /// Canonical Markdown form.
    pub fn to_markdown(&self) -> String {
        match self {
            Block::Paragraph(content) => inline::to_markdown(content),
            Block::Heading { level, content } => {
                format!(
                    "{} {}",
                    "#".repeat(*level as usize),
                    inline::to_markdown(content)
                )
            }
            Block::Code { language, code } => {
                let fence = code_fence(code);
                let language = language.as_deref().unwrap_or("");
                if code.is_empty() {
                    format!("{fence}{language}\n{fence}")
                } else {
                    let body = code.strip_suffix('\n').unwrap_or(code);
                    format!("{fence}{language}\n{body}\n{fence}")
                }
            }
            Block::Quote(children) => {
                let body = children
                    .iter()
                    .map(Block::to_markdown)
                    .collect::<Vec<_>>()
                    .join("\n\n");
                if body.is_empty() {
                    return ">".to_string();
                }
                body.lines()
                    .map(|line| {
                        if line.is_empty() {
                            ">".to_string()
                        } else {
                            format!("> {line}")
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Block::HorizontalRule => "---".to_string(),
            Block::List(list) => list.to_markdown_indented(0),
            Block::InlineHtml(raw) => raw.clone(),
            Block::Table(table) => table.to_markdown(),
            Block::TableOfContents => "[[ToC]]".to_string(),
            Block::Latex { raw } => format!("$$\n{raw}\n$$"),
        }
    }
}

fn code_fence(code: &str) -> String {
    let mut longest = 2;
    let mut current = 0;
    for ch in code.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    "`".repeat(longest + 1)
}

/// Identifier for a heading: the `encodeURI`-escaped plain text with `%20`
/// replaced by `-`, ASCII-lowercased. Stable across calls; duplicates are
/// the caller's concern.
pub fn heading_id(content: &[Inline]) -> String {
    let plain = inline::plain_text(content);
    utf8_percent_encode(&plain, ENCODE_URI)
        .to_string()
        .replace("%20", "-")
        .to_ascii_lowercase()
}

/// A list: ordered or unordered, with its entries.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: bool,
    /// First ordinal of an ordered list; serialized and rendered only when
    /// it is not 1.
    pub start: u32,
    pub entries: Vec<ListEntry>,
}

impl List {
    pub fn new(ordered: bool) -> Self {
        List {
            ordered,
            start: 1,
            entries: Vec::new(),
        }
    }

    pub(crate) fn to_markdown_indented(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let mut lines = Vec::new();
        let mut ordinal = self.start;
        for entry in &self.entries {
            let marker = if self.ordered {
                let marker = format!("{ordinal}. ");
                ordinal += 1;
                marker
            } else {
                "- ".to_string()
            };
            let checkbox = match entry.checked {
                Some(true) => "[x] ",
                Some(false) => "[ ] ",
                None => "",
            };
            lines.push(format!(
                "{pad}{marker}{checkbox}{}",
                inline::to_markdown(&entry.content)
            ));
            for sublist in &entry.sublists {
                lines.push(sublist.to_markdown_indented(indent + 4));
            }
        }
        lines.join("\n")
    }
}

/// One list entry: its inline content, nested sublists, and the task
/// checkbox state (`None` when the entry has no checkbox).
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub content: Vec<Inline>,
    pub sublists: Vec<List>,
    pub checked: Option<bool>,
}

impl ListEntry {
    pub fn new(content: Vec<Inline>) -> Self {
        ListEntry {
            content,
            sublists: Vec::new(),
            checked: None,
        }
    }
}

/// Column alignment; applies to one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// The divider-row cell for this alignment.
    pub fn divider(&self) -> &'static str {
        match self {
            Alignment::None => "---",
            Alignment::Left => ":--",
            Alignment::Center => ":-:",
            Alignment::Right => "--:",
        }
    }

    /// CSS `text-align` value, `None` for unaligned columns.
    pub fn css(&self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
        }
    }
}

/// A pipe table. The first row is always the header; `alignments[i]`
/// applies to column `i` and defaults to [`Alignment::None`].
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub rows: Vec<TableRow>,
    pub alignments: Vec<Alignment>,
}

impl Table {
    /// Alignment of the given column.
    pub fn alignment(&self, column: usize) -> Alignment {
        self.alignments.get(column).copied().unwrap_or_default()
    }

    fn to_markdown(&self) -> String {
        let mut lines = Vec::new();
        let columns = self.rows.first().map_or(0, |row| row.entries.len());
        for (index, row) in self.rows.iter().enumerate() {
            lines.push(row.to_markdown());
            if index == 0 {
                let dividers: Vec<&str> = (0..columns)
                    .map(|column| self.alignment(column).divider())
                    .collect();
                lines.push(format!("| {} |", dividers.join(" | ")));
            }
        }
        lines.join("\n")
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub entries: Vec<TableEntry>,
}

impl TableRow {
    fn to_markdown(&self) -> String {
        let cells: Vec<String> = self
            .entries
            .iter()
            .map(|entry| inline::to_markdown(&entry.content))
            .collect();
        format!("| {} |", cells.join(" | "))
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry {
    pub content: Vec<Inline>,
}
