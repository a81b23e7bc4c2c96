//! The document root: block sequence plus reference table.

use crate::ast::block::Block;
use std::collections::HashMap;

/// A named link target: `(url, tooltip?)`, looked up case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub url: String,
    pub tooltip: Option<String>,
}

impl Reference {
    pub fn new(url: &str, tooltip: Option<String>) -> Self {
        Reference {
            url: url.to_string(),
            tooltip,
        }
    }
}

/// A parsed document: ordered blocks plus the reference table.
///
/// Reference names are compared case-insensitively; they are stored
/// lowercased. The renderer reads the table and never mutates it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub references: HashMap<String, Reference>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    /// Append a block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Store a reference under a case-insensitive name.
    pub fn set_reference(&mut self, name: &str, reference: Reference) {
        self.references
            .insert(name.to_ascii_lowercase(), reference);
    }

    /// Whether a reference with this name exists.
    pub fn has_reference(&self, name: &str) -> bool {
        self.references.contains_key(&name.to_ascii_lowercase())
    }

    /// Look up a reference by case-insensitive name.
    pub fn reference(&self, name: &str) -> Option<&Reference> {
        self.references.get(&name.to_ascii_lowercase())
    }

    /// Drop all blocks and references.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.references.clear();
    }

    /// Serialize the whole document: blocks separated by blank lines, then
    /// the reference definitions in sorted order (sorting keeps the output
    /// independent of hash-map iteration). Total; never fails.
    pub fn to_markdown(&self) -> String {
        let mut parts: Vec<String> = self.blocks.iter().map(Block::to_markdown).collect();
        let mut names: Vec<&String> = self.references.keys().collect();
        names.sort();
        for name in names {
            let reference = &self.references[name];
            let definition = match &reference.tooltip {
                Some(tooltip) => format!("[{name}]: {} \"{tooltip}\"", reference.url),
                None => format!("[{name}]: {}", reference.url),
            };
            parts.push(definition);
        }
        let mut out = parts.join("\n\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}
