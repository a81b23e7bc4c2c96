//! Markdown parser: source text -> [`Document`].
//!
//! Two-pass design. The block pass splits the input into logical lines and
//! runs a prioritized set of line recognizers (fenced code first, paragraph
//! last); the inline pass tokenizes each block's text with delimiter
//! scanning. Parsing is total: malformed input never fails, it degrades to
//! literal text.
//!
//! - `block.rs` — line scanner and block recognizers
//! - `inline.rs` — inline tokenizer (emphasis, links, code spans, ...)

pub mod block;
pub mod inline;

use crate::ast::Document;
use std::collections::HashSet;

/// Feature switches for the parser.
///
/// Every field has a default; callers override by field or through the
/// `with_*` builders.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Recognize bare `http(s)://` URLs in text. Angle-bracket autolinks
    /// are always recognized.
    pub auto_link: bool,
    /// Shortcodes recognized as emoji. Empty set disables `:name:`
    /// recognition entirely.
    pub emoji_dictionary: HashSet<String>,
    /// Enable `$...$` and `$$...$$` LaTeX.
    pub latex: bool,
    /// Treat every newline inside a paragraph as a hard linebreak.
    pub newline_as_linebreaks: bool,
    /// Enable 4-space-indent code blocks.
    pub code_block_from_indent: bool,
    /// Tags that never open an inline HTML block (their lines fall through
    /// to the paragraph recognizer and end up escaped). `None` uses the
    /// sanitizer's default disallowed set.
    pub disallowed_inline_html_tags: Option<Vec<String>>,
}

impl ParseOptions {
    pub fn new() -> Self {
        ParseOptions::default()
    }

    pub fn with_auto_link(mut self, auto_link: bool) -> Self {
        self.auto_link = auto_link;
        self
    }

    pub fn with_emoji_dictionary<I, S>(mut self, shortcodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.emoji_dictionary = shortcodes
            .into_iter()
            .map(|code| code.as_ref().to_string())
            .collect();
        self
    }

    pub fn with_latex(mut self, latex: bool) -> Self {
        self.latex = latex;
        self
    }

    pub fn with_newline_as_linebreaks(mut self, enabled: bool) -> Self {
        self.newline_as_linebreaks = enabled;
        self
    }

    pub fn with_code_block_from_indent(mut self, enabled: bool) -> Self {
        self.code_block_from_indent = enabled;
        self
    }
}

/// Parse Markdown source into a document. Total; never fails.
pub fn parse(source: &str, options: &ParseOptions) -> Document {
    let normalized = source.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let mut document = Document::new();
    let mut parser = block::BlockParser::new(options, &mut document);
    parser.parse_lines(&lines);
    document
}
