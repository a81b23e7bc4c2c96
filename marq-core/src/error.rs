//! Error types for rendering.
//!
//! Parsing has no error type: malformed input always degrades to literal
//! text and `parse` returns a [`Document`](crate::ast::Document)
//! unconditionally.

use std::fmt;

/// Errors that can occur while lowering a document to HTML.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A user-supplied extension callback failed. Only the LaTeX renderer is
    /// absorbed into a fallback element; every other hook propagates here.
    Extension {
        hook: &'static str,
        message: String,
    },
    /// Internal invariant violation surfaced during lowering or
    /// serialization. Never produced for malformed user input.
    InvalidNode(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Extension { hook, message } => {
                write!(f, "Extension '{hook}' failed: {message}")
            }
            RenderError::InvalidNode(msg) => write!(f, "Invalid node: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}
