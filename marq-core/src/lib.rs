//! Marq Markdown dialect: document model, parser and HTML renderer.
//!
//! This crate owns the Markdown side of the pipeline:
//!
//! `source text -> parse() -> Document -> render() -> marq_html::Element`
//!
//! The dialect is CommonMark-adjacent with extra inline features:
//! strikethrough, highlights, spoilers, underline, emoji shortcodes,
//! inline/display LaTeX, task-list checkboxes, pipe tables with column
//! alignment, reference links with a document-level reference table,
//! inline HTML passthrough (sanitized at render time) and a [[ToC]]
//! directive.
//!
//! This is a pure lib: no I/O, no logging, no environment assumptions.
//! Parsing is total (malformed input degrades to literal text), and the
//! renderer only fails when a caller-supplied extension callback fails.
//!
//! # Architecture
//!
//! The file structure:
//! ```text
//! .
//! ├── error.rs          # RenderError
//! ├── ast
//! │   ├── inline.rs     # Inline variants + canonical Markdown forms
//! │   ├── block.rs      # Block variants, lists, tables, heading ids
//! │   ├── document.rs   # Document + reference table
//! │   └── json.rs       # tagged-object JSON codec
//! ├── parser
//! │   ├── block.rs      # block pass (prioritized line recognizers)
//! │   └── inline.rs     # inline pass (delimiter scanning)
//! └── render
//!     ├── options.rs    # RenderOptions + extension callbacks
//!     └── toc.rs        # [[ToC]] expansion
//! ```
//!
//! # Extension points
//!
//! Syntax highlighting, LaTeX typesetting, emoji artwork and table
//! post-processing are collaborators, not dependencies: the renderer
//! calls whatever the options carry and otherwise falls back to plain
//! output (literal shortcodes, raw LaTeX source, unhighlighted code).
//!
//! # Example
//!
//! ```
//! use marq_core::{parse, render_to_string, ParseOptions, RenderOptions};
//!
//! let doc = parse("hello *world*", &ParseOptions::default());
//! let html = render_to_string(&doc, &RenderOptions::default()).unwrap();
//! assert_eq!(html, "<p>hello <em>world</em></p>");
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod render;

pub use ast::{Block, Document, Inline, JsonError, Reference};
pub use error::RenderError;
pub use parser::{parse, ParseOptions};
pub use render::{render, render_to_string, RenderOptions};
