//! Tree types and builder-style mutation.
//!
//! A node is an element, a text run, or a comment. Elements own their
//! attributes and children directly; nodes have no identity beyond their
//! structural contents, so the whole tree derives `Clone` and `PartialEq`.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Tags that serialize without children and without a closing tag.
static VOID_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
        "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// Tags whose subtree keeps whitespace verbatim when pretty-printing.
static PRESERVE_TAGS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["pre", "code", "textarea"].into_iter().collect());

/// A single node in the HTML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(String),
}

impl Node {
    /// Returns the element payload when this node is an element.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the text content when this node is a text run.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(&text.content),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<&str> for Node {
    fn from(content: &str) -> Self {
        Node::Text(Text::new(content))
    }
}

impl From<String> for Node {
    fn from(content: String) -> Self {
        Node::Text(Text {
            content,
            mode: TextMode::Normal,
        })
    }
}

/// How a text node's content is escaped by the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// HTML-escape `&`, `<` and `>`.
    #[default]
    Normal,
    /// Pass the content through untouched.
    Raw,
    /// Escape `<` and `>` but not `&`, so entity-looking source inside
    /// backtick-originated code survives verbatim.
    Code,
}

/// A text run with its escaping mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub mode: TextMode,
}

impl Text {
    /// Create a text node with [`TextMode::Normal`] escaping.
    pub fn new(content: &str) -> Self {
        Text {
            content: content.to_string(),
            mode: TextMode::Normal,
        }
    }

    /// Create a text node with an explicit escaping mode.
    pub fn with_mode(content: &str, mode: TextMode) -> Self {
        Text {
            content: content.to_string(),
            mode,
        }
    }
}

/// Tag metadata: name plus the serialization traits derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    /// Void tags hold no children and emit no closing tag.
    pub self_closing: bool,
    /// Whitespace under this tag is significant.
    pub preserve_whitespace: bool,
}

impl Tag {
    /// Create a tag, deriving void/whitespace behavior from the name.
    ///
    /// Names are normalized to ASCII lowercase.
    pub fn new(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let self_closing = VOID_TAGS.contains(name.as_str());
        let preserve_whitespace = PRESERVE_TAGS.contains(name.as_str());
        Tag {
            name,
            self_closing,
            preserve_whitespace,
        }
    }
}

/// An attribute value: plain string, space-delimited token list, or style map.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Single(String),
    /// Space-delimited tokens (e.g. `class`). Kept as a list so tokens can be
    /// merged without duplicates.
    TokenList(Vec<String>),
    /// `style` as ordered key/value pairs.
    StyleMap(Vec<(String, String)>),
}

impl AttrValue {
    /// Render the value to its serialized attribute string.
    pub fn to_value_string(&self) -> String {
        match self {
            AttrValue::Single(value) => value.clone(),
            AttrValue::TokenList(tokens) => tokens.join(" "),
            AttrValue::StyleMap(entries) => entries
                .iter()
                .map(|(key, value)| format!("{key}:{value}"))
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

/// A named attribute on an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

/// An element: tag, ordered attributes, ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: Tag,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element with the given tag name.
    pub fn new(name: &str) -> Self {
        Element {
            tag: Tag::new(name),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append a child node. Strings coerce to normal-mode text.
    ///
    /// Children appended to a void tag are discarded; void tags hold none.
    pub fn push(&mut self, child: impl Into<Node>) -> &mut Self {
        if !self.tag.self_closing {
            self.children.push(child.into());
        }
        self
    }

    /// Append a text child with an explicit escaping mode.
    pub fn push_text(&mut self, content: &str, mode: TextMode) -> &mut Self {
        self.push(Text::with_mode(content, mode))
    }

    /// Builder-style [`push`](Element::push) for construction chains.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.push(child);
        self
    }

    /// Builder-style [`set_attr`](Element::set_attr).
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Look up an attribute's serialized value.
    pub fn attr(&self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.to_value_string())
    }

    /// Set an attribute, replacing any existing value under the same name.
    ///
    /// Attribute names are normalized to ASCII lowercase and stay unique per
    /// element. Setting `class` goes through the token list so repeated sets
    /// merge rather than duplicate tokens.
    pub fn set_attr(&mut self, name: &str, value: &str) -> &mut Self {
        let name = name.to_ascii_lowercase();
        if name == "class" {
            for token in value.split_ascii_whitespace() {
                self.add_token("class", token);
            }
            return self;
        }
        let value = AttrValue::Single(value.to_string());
        self.set_attr_value(&name, value);
        self
    }

    /// Add a token to a tokenized attribute (creating it if absent).
    ///
    /// Duplicate tokens are ignored. A pre-existing single-string value is
    /// converted to a token list first.
    pub fn add_token(&mut self, name: &str, token: &str) -> &mut Self {
        let name = name.to_ascii_lowercase();
        if token.is_empty() {
            return self;
        }
        match self.attribute_mut(&name) {
            Some(attribute) => {
                let tokens = match &mut attribute.value {
                    AttrValue::TokenList(tokens) => tokens,
                    other => {
                        let existing: Vec<String> = other
                            .to_value_string()
                            .split_ascii_whitespace()
                            .map(str::to_string)
                            .collect();
                        *other = AttrValue::TokenList(existing);
                        match other {
                            AttrValue::TokenList(tokens) => tokens,
                            _ => unreachable!(),
                        }
                    }
                };
                if !tokens.iter().any(|existing| existing == token) {
                    tokens.push(token.to_string());
                }
            }
            None => {
                self.attributes.push(Attribute {
                    name,
                    value: AttrValue::TokenList(vec![token.to_string()]),
                });
            }
        }
        self
    }

    /// Set one key of the `style` attribute, replacing an existing entry.
    pub fn set_style(&mut self, key: &str, value: &str) -> &mut Self {
        match self.attribute_mut("style") {
            Some(attribute) => {
                let entries = match &mut attribute.value {
                    AttrValue::StyleMap(entries) => entries,
                    other => {
                        // Reinterpret a plain string value as a style map.
                        let parsed: Vec<(String, String)> = other
                            .to_value_string()
                            .split(';')
                            .filter_map(|entry| {
                                entry
                                    .split_once(':')
                                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                            })
                            .collect();
                        *other = AttrValue::StyleMap(parsed);
                        match other {
                            AttrValue::StyleMap(entries) => entries,
                            _ => unreachable!(),
                        }
                    }
                };
                match entries.iter_mut().find(|(existing, _)| existing == key) {
                    Some(entry) => entry.1 = value.to_string(),
                    None => entries.push((key.to_string(), value.to_string())),
                }
            }
            None => {
                self.attributes.push(Attribute {
                    name: "style".to_string(),
                    value: AttrValue::StyleMap(vec![(key.to_string(), value.to_string())]),
                });
            }
        }
        self
    }

    /// Serialize the children only.
    pub fn inner_html(&self) -> String {
        crate::serialize::inner_html(self)
    }

    /// Serialize the element including its own tag.
    pub fn outer_html(&self) -> String {
        crate::serialize::outer_html(self)
    }

    /// Recursively drop children that contribute nothing to the output:
    /// text nodes whose escaped content is empty and non-void elements that
    /// end up with no children. Void tags always survive.
    pub fn purge_empty_children(&mut self) {
        self.children.retain_mut(|child| match child {
            Node::Element(element) => {
                element.purge_empty_children();
                element.tag.self_closing || !element.children.is_empty()
            }
            Node::Text(text) => !text.content.is_empty(),
            Node::Comment(_) => true,
        });
    }

    fn set_attr_value(&mut self, name: &str, value: AttrValue) {
        match self.attribute_mut(name) {
            Some(attribute) => attribute.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes
            .iter_mut()
            .find(|attribute| attribute.name == name)
    }
}
