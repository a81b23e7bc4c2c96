//! Allowlist sanitizer.
//!
//! Depth-first scrub of an HTML subtree against a policy: a set of
//! disallowed tags and a per-tag attribute allowlist. Elements with a
//! disallowed tag are dropped (or unwrapped into their children, per
//! policy); every surviving element keeps only the attributes allowed for
//! its tag plus the `*` wildcard entry. Text and comment nodes pass through
//! unchanged.
//!
//! The scrub is purely structural (no serializer round-trip) and
//! idempotent: sanitizing an already-sanitized tree is a no-op.

use crate::node::{Element, Node};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

static DEFAULT_DISALLOWED_TAGS: Lazy<HashSet<String>> = Lazy::new(|| {
    [
        "iframe",
        "noembed",
        "noframes",
        "plaintext",
        "script",
        "style",
        "svg",
        "textarea",
        "title",
        "xmp",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
});

static DEFAULT_ATTRIBUTE_POLICY: Lazy<HashMap<String, Vec<String>>> = Lazy::new(|| {
    let mut policy = HashMap::new();
    policy.insert(
        "*".to_string(),
        ["align", "aria-hidden", "class", "id", "lang", "style", "title"]
            .into_iter()
            .map(str::to_string)
            .collect(),
    );
    policy.insert(
        "img".to_string(),
        ["width", "height", "src", "alt"]
            .into_iter()
            .map(str::to_string)
            .collect(),
    );
    policy.insert("a".to_string(), vec!["href".to_string()]);
    policy
});

/// What to do with an element whose tag is disallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisallowedTagMode {
    /// Drop the element and everything under it.
    #[default]
    Drop,
    /// Replace the element with its (sanitized) children.
    Unwrap,
}

/// Sanitization policy: disallowed tags plus a per-tag attribute allowlist.
#[derive(Debug, Clone)]
pub struct SanitizePolicy {
    pub disallowed_tags: HashSet<String>,
    /// Tag name (or `*`) -> allowed attribute names.
    pub attribute_policy: HashMap<String, Vec<String>>,
    pub disallowed_tag_mode: DisallowedTagMode,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        SanitizePolicy {
            disallowed_tags: DEFAULT_DISALLOWED_TAGS.clone(),
            attribute_policy: DEFAULT_ATTRIBUTE_POLICY.clone(),
            disallowed_tag_mode: DisallowedTagMode::Drop,
        }
    }
}

impl SanitizePolicy {
    /// Replace the disallowed tag set, keeping the default attribute policy.
    pub fn with_disallowed_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.disallowed_tags = tags
            .into_iter()
            .map(|tag| tag.as_ref().to_ascii_lowercase())
            .collect();
        self
    }

    fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        let allowed_for = |key: &str| {
            self.attribute_policy
                .get(key)
                .is_some_and(|names| names.iter().any(|name| name == attribute))
        };
        allowed_for(tag) || allowed_for("*")
    }
}

/// Sanitize an element in place: scrub its own attributes and its whole
/// subtree. The root element's tag is left alone (callers pass their own
/// container); disallowed tags below it are dropped or unwrapped.
pub fn sanitize(element: &mut Element, policy: &SanitizePolicy) {
    scrub_attributes(element, policy);
    element.children = sanitize_nodes(std::mem::take(&mut element.children), policy);
}

/// Sanitize a sequence of sibling nodes, returning the survivors.
pub fn sanitize_nodes(nodes: Vec<Node>, policy: &SanitizePolicy) -> Vec<Node> {
    let mut survivors = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(mut element) => {
                if policy.disallowed_tags.contains(element.tag.name.as_str()) {
                    match policy.disallowed_tag_mode {
                        DisallowedTagMode::Drop => {}
                        DisallowedTagMode::Unwrap => {
                            survivors
                                .extend(sanitize_nodes(std::mem::take(&mut element.children), policy));
                        }
                    }
                    continue;
                }
                sanitize(&mut element, policy);
                survivors.push(Node::Element(element));
            }
            other => survivors.push(other),
        }
    }
    survivors
}

fn scrub_attributes(element: &mut Element, policy: &SanitizePolicy) {
    let tag = element.tag.name.clone();
    element
        .attributes
        .retain(|attribute| policy.allows_attribute(&tag, &attribute.name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Element;

    fn nested_sample() -> Element {
        let mut root = Element::new("div");
        root.set_attr("onclick", "x()");
        root.set_attr("class", "note");
        root.push("hi");
        let mut script = Element::new("script");
        script.push("bad()");
        root.push(script);
        let mut anchor = Element::new("a");
        anchor.set_attr("href", "https://ex.com");
        anchor.set_attr("onmouseover", "y()");
        anchor.push("link");
        root.push(anchor);
        root
    }

    #[test]
    fn test_disallowed_tag_dropped() {
        let mut root = nested_sample();
        sanitize(&mut root, &SanitizePolicy::default());
        let html = root.outer_html();
        assert!(!html.contains("script"));
        assert!(!html.contains("bad()"));
    }

    #[test]
    fn test_attributes_scrubbed() {
        let mut root = nested_sample();
        sanitize(&mut root, &SanitizePolicy::default());
        assert_eq!(root.attr("onclick"), None);
        assert_eq!(root.attr("class").as_deref(), Some("note"));
        let anchor = root.children[1].as_element().expect("anchor survives");
        assert_eq!(anchor.attr("href").as_deref(), Some("https://ex.com"));
        assert_eq!(anchor.attr("onmouseover"), None);
    }

    #[test]
    fn test_unwrap_mode_keeps_children() {
        let mut root = nested_sample();
        let policy = SanitizePolicy {
            disallowed_tag_mode: DisallowedTagMode::Unwrap,
            ..SanitizePolicy::default()
        };
        sanitize(&mut root, &policy);
        let html = root.outer_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("bad()"));
    }

    #[test]
    fn test_idempotent() {
        let mut once = nested_sample();
        sanitize(&mut once, &SanitizePolicy::default());
        let mut twice = once.clone();
        sanitize(&mut twice, &SanitizePolicy::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_tree_untouched() {
        let mut root = Element::new("p");
        root.set_attr("class", "lead");
        root.push("text");
        let before = root.clone();
        sanitize(&mut root, &SanitizePolicy::default());
        assert_eq!(root, before);
    }
}
