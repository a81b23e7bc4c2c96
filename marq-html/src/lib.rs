//! HTML tree model for the Marq toolchain.
//!
//! This crate owns the HTML side of the pipeline: a small DOM-like tree
//! (element / text / comment nodes), a serializer with per-mode text
//! escaping, an allowlist sanitizer, and a fragment micro-parser that can
//! read back what the serializer emits plus the inline HTML subtrees
//! typically found inside Markdown documents.
//!
//! This is a pure lib: no I/O, no logging, no assumptions about a shell
//! or browser environment. Callers attach the produced tree to whatever
//! document model they own.
//!
//! # Library Choice
//!
//! The tree is hand-rolled rather than built on a browser-grade DOM crate.
//! Two requirements rule those out:
//! - Text nodes carry an escaping *mode* (`Normal`, `Raw`, `Code`); the
//!   `Code` mode escapes `<`/`>` but deliberately not `&`, which no generic
//!   serializer exposes.
//! - Sanitization must operate structurally on the tree (tag drop + attribute
//!   allowlist) without a serialize/reparse round-trip.
//!
//! Nodes own their children directly (`Vec<Node>`); nothing in the pipeline
//! needs shared mutation, so there is no reference counting.
//!
//! # Architecture
//!
//! - `node.rs` — tree types and builder-style mutation
//! - `serialize.rs` — escaping rules, compact and pretty emit
//! - `sanitize.rs` — tag/attribute allowlist scrub
//! - `parse.rs` — fragment string -> nodes

pub mod node;
pub mod parse;
pub mod sanitize;
pub mod serialize;

pub use node::{AttrValue, Attribute, Element, Node, Tag, Text, TextMode};
pub use parse::parse;
pub use sanitize::{sanitize, sanitize_nodes, DisallowedTagMode, SanitizePolicy};
