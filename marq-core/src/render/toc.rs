//! `[[ToC]]` expansion: collected headings become an ordered list.

use crate::ast::block::{heading_id, Block, List, ListEntry};
use crate::ast::inline::Inline;
use crate::ast::Document;

/// Build the table-of-contents list for a document, or `None` when it has
/// no headings.
///
/// Headings are collected in document order. With at least one H1 the H1s
/// form the top level (an H2 sits in an H1's sublist); in a document with
/// no H1s at all, H2 acts as the top level instead. Skipped levels get
/// empty intermediate entries so every heading lands at its own depth.
pub(crate) fn build_list(document: &Document) -> Option<List> {
    let headings: Vec<(u8, String, Vec<Inline>)> = document
        .blocks
        .iter()
        .filter_map(|block| match block {
            Block::Heading { level, content } => {
                Some((*level, heading_id(content), content.clone()))
            }
            _ => None,
        })
        .collect();
    if headings.is_empty() {
        return None;
    }

    let top_level = if headings.iter().any(|(level, _, _)| *level == 1) {
        1
    } else {
        2
    };

    let mut root = List::new(true);
    for (level, id, content) in headings {
        let depth = level.saturating_sub(top_level) as usize;
        let target = descend(&mut root, depth);
        let link = Inline::link(&format!("#{id}"), content, None, "");
        target.entries.push(ListEntry::new(vec![link]));
    }
    Some(root)
}

/// Walk `depth` levels down the list's trailing edge, creating empty
/// entries and sublists where the document skipped a heading level.
fn descend(root: &mut List, depth: usize) -> &mut List {
    let mut current = root;
    for _ in 0..depth {
        if current.entries.is_empty() {
            current.entries.push(ListEntry::new(Vec::new()));
        }
        let entry = current.entries.last_mut().expect("entry just ensured");
        if entry.sublists.is_empty() {
            entry.sublists.push(List::new(true));
        }
        current = entry.sublists.last_mut().expect("sublist just ensured");
    }
    current
}
