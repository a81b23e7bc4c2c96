//! Document model for the Marq Markdown dialect.
//!
//! Two disjoint node categories: [`Inline`] nodes live inside a block's
//! text, [`Block`] nodes occupy whole lines. A [`Document`] owns an ordered
//! block sequence plus a case-insensitive reference table. Every node knows
//! its canonical Markdown form (`to_markdown`) and its JSON form
//! ([`json`]).

pub mod block;
pub mod document;
pub mod inline;
pub mod json;

pub use block::{Alignment, Block, List, ListEntry, Table, TableEntry, TableRow};
pub use document::{Document, Reference};
pub use inline::Inline;
pub use json::JsonError;
