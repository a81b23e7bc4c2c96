//! JSON codec for the document model.
//!
//! Every node emits a tagged object `{ "type": "<kind>", ... }`; plain text
//! serializes as a bare JSON string. `from_json(to_json(node)) == node`
//! holds for every node and for whole documents.
//!
//! Optional fields (`tooltip`, `language`, `skin_tone`, a link's reference
//! name) are omitted when absent rather than emitted as `null`, except for
//! `checked`, whose `null` is meaningful (no checkbox at all).

use crate::ast::block::{Alignment, Block, List, ListEntry, Table, TableEntry, TableRow};
use crate::ast::document::{Document, Reference};
use crate::ast::inline::Inline;
use serde_json::{json, Map, Value};
use std::fmt;

/// Error produced when `from_json` meets a value of the wrong shape.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonError(pub String);

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON decode error: {}", self.0)
    }
}

impl std::error::Error for JsonError {}

impl Inline {
    pub fn to_json(&self) -> Value {
        match self {
            Inline::Text(content) => Value::String(content.clone()),
            Inline::Linebreak => json!({ "type": "linebreak" }),
            Inline::Emoji { id, skin_tone } => match skin_tone {
                Some(tone) => json!({ "type": "emoji", "id": id, "skin_tone": tone }),
                None => json!({ "type": "emoji", "id": id }),
            },
            Inline::Code(content) => json!({ "type": "inline_code", "content": content }),
            Inline::Autolink(url) => json!({ "type": "inline_link", "url": url }),
            Inline::Link {
                url,
                content,
                tooltip,
                ref_name,
            } => link_to_json("link", url, content, tooltip, ref_name),
            Inline::Image {
                url,
                content,
                tooltip,
                ref_name,
            } => link_to_json("image", url, content, tooltip, ref_name),
            Inline::Italic(content) => container_to_json("italic", content),
            Inline::Bold(content) => container_to_json("bold", content),
            Inline::Underline(content) => container_to_json("underline", content),
            Inline::Strikethrough(content) => container_to_json("strikethrough", content),
            Inline::Highlight(content) => container_to_json("highlight", content),
            Inline::Spoiler(content) => container_to_json("spoiler", content),
            Inline::Latex { raw, display } => {
                json!({ "type": "inline_latex", "raw": raw, "display": display })
            }
            Inline::Comment(content) => json!({ "type": "comment", "content": content }),
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, JsonError> {
        if let Value::String(content) = value {
            return Ok(Inline::Text(content.clone()));
        }
        let object = as_object(value)?;
        let kind = get_str(object, "type")?;
        match kind {
            "linebreak" => Ok(Inline::Linebreak),
            "emoji" => Ok(Inline::Emoji {
                id: get_str(object, "id")?.to_string(),
                skin_tone: match object.get("skin_tone") {
                    Some(value) => Some(as_u64(value)? as u8),
                    None => None,
                },
            }),
            "inline_code" => Ok(Inline::Code(get_str(object, "content")?.to_string())),
            "inline_link" => Ok(Inline::Autolink(get_str(object, "url")?.to_string())),
            "link" => {
                let (url, content, tooltip, ref_name) = link_from_json(object)?;
                Ok(Inline::Link {
                    url,
                    content,
                    tooltip,
                    ref_name,
                })
            }
            "image" => {
                let (url, content, tooltip, ref_name) = link_from_json(object)?;
                Ok(Inline::Image {
                    url,
                    content,
                    tooltip,
                    ref_name,
                })
            }
            "italic" => Ok(Inline::Italic(inlines_from_json(object)?)),
            "bold" => Ok(Inline::Bold(inlines_from_json(object)?)),
            "underline" => Ok(Inline::Underline(inlines_from_json(object)?)),
            "strikethrough" => Ok(Inline::Strikethrough(inlines_from_json(object)?)),
            "highlight" => Ok(Inline::Highlight(inlines_from_json(object)?)),
            "spoiler" => Ok(Inline::Spoiler(inlines_from_json(object)?)),
            "inline_latex" => Ok(Inline::Latex {
                raw: get_str(object, "raw")?.to_string(),
                display: object
                    .get("display")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            }),
            "comment" => Ok(Inline::Comment(get_str(object, "content")?.to_string())),
            other => Err(JsonError(format!("unknown inline kind '{other}'"))),
        }
    }
}

impl Block {
    pub fn to_json(&self) -> Value {
        match self {
            Block::Paragraph(content) => {
                json!({ "type": "paragraph", "content": inlines_to_json(content) })
            }
            Block::Heading { level, content } => {
                json!({ "type": "heading", "level": level, "content": inlines_to_json(content) })
            }
            Block::Code { language, code } => match language {
                Some(language) => {
                    json!({ "type": "block_code", "language": language, "code": code })
                }
                None => json!({ "type": "block_code", "code": code }),
            },
            Block::Quote(children) => {
                let children: Vec<Value> = children.iter().map(Block::to_json).collect();
                json!({ "type": "quote", "content": children })
            }
            Block::HorizontalRule => json!({ "type": "horizontal_rule" }),
            Block::List(list) => list.to_json(),
            Block::InlineHtml(raw) => json!({ "type": "inline_html", "html": raw }),
            Block::Table(table) => table.to_json(),
            Block::TableOfContents => json!({ "type": "table_of_contents" }),
            Block::Latex { raw } => {
                json!({ "type": "inline_latex", "raw": raw, "display": true })
            }
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, JsonError> {
        let object = as_object(value)?;
        let kind = get_str(object, "type")?;
        match kind {
            "paragraph" => Ok(Block::Paragraph(inlines_from_json(object)?)),
            "heading" => {
                let level = as_u64(require(object, "level")?)? as u8;
                Ok(Block::Heading {
                    level,
                    content: inlines_from_json(object)?,
                })
            }
            "block_code" => Ok(Block::Code {
                language: match object.get("language") {
                    Some(value) => Some(as_str(value)?.to_string()),
                    None => None,
                },
                code: get_str(object, "code")?.to_string(),
            }),
            "quote" => {
                let children = as_array(require(object, "content")?)?;
                Ok(Block::Quote(
                    children.iter().map(Block::from_json).collect::<Result<_, _>>()?,
                ))
            }
            "horizontal_rule" => Ok(Block::HorizontalRule),
            "list" => Ok(Block::List(List::from_json(value)?)),
            "inline_html" => Ok(Block::InlineHtml(get_str(object, "html")?.to_string())),
            "table" => Ok(Block::Table(Table::from_json(object)?)),
            "table_of_contents" => Ok(Block::TableOfContents),
            "inline_latex" => Ok(Block::Latex {
                raw: get_str(object, "raw")?.to_string(),
            }),
            other => Err(JsonError(format!("unknown block kind '{other}'"))),
        }
    }
}

impl List {
    pub fn to_json(&self) -> Value {
        let entries: Vec<Value> = self.entries.iter().map(ListEntry::to_json).collect();
        json!({
            "type": "list",
            "ordered": self.ordered,
            "start": self.start,
            "entries": entries,
        })
    }

    pub fn from_json(value: &Value) -> Result<Self, JsonError> {
        let object = as_object(value)?;
        expect_kind(object, "list")?;
        let entries = as_array(require(object, "entries")?)?;
        Ok(List {
            ordered: as_bool(require(object, "ordered")?)?,
            start: as_u64(require(object, "start")?)? as u32,
            entries: entries
                .iter()
                .map(ListEntry::from_json)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl ListEntry {
    pub fn to_json(&self) -> Value {
        let sublists: Vec<Value> = self.sublists.iter().map(List::to_json).collect();
        json!({
            "type": "list_entry",
            "content": inlines_to_json(&self.content),
            "sublists": sublists,
            "checked": self.checked,
        })
    }

    pub fn from_json(value: &Value) -> Result<Self, JsonError> {
        let object = as_object(value)?;
        expect_kind(object, "list_entry")?;
        let sublists = as_array(require(object, "sublists")?)?;
        let checked = match require(object, "checked")? {
            Value::Null => None,
            Value::Bool(checked) => Some(*checked),
            other => return Err(JsonError(format!("expected bool or null, got {other}"))),
        };
        Ok(ListEntry {
            content: inlines_from_json(object)?,
            sublists: sublists
                .iter()
                .map(List::from_json)
                .collect::<Result<_, _>>()?,
            checked,
        })
    }
}

impl Table {
    pub fn to_json(&self) -> Value {
        let rows: Vec<Value> = self.rows.iter().map(TableRow::to_json).collect();
        let alignments: Vec<&str> = self
            .alignments
            .iter()
            .map(|alignment| match alignment {
                Alignment::None => "none",
                Alignment::Left => "left",
                Alignment::Center => "center",
                Alignment::Right => "right",
            })
            .collect();
        json!({ "type": "table", "rows": rows, "alignments": alignments })
    }

    fn from_json(object: &Map<String, Value>) -> Result<Self, JsonError> {
        let rows = as_array(require(object, "rows")?)?;
        let alignments = as_array(require(object, "alignments")?)?;
        Ok(Table {
            rows: rows
                .iter()
                .map(TableRow::from_json)
                .collect::<Result<_, _>>()?,
            alignments: alignments
                .iter()
                .map(|value| match as_str(value)? {
                    "none" => Ok(Alignment::None),
                    "left" => Ok(Alignment::Left),
                    "center" => Ok(Alignment::Center),
                    "right" => Ok(Alignment::Right),
                    other => Err(JsonError(format!("unknown alignment '{other}'"))),
                })
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TableRow {
    pub fn to_json(&self) -> Value {
        let entries: Vec<Value> = self.entries.iter().map(TableEntry::to_json).collect();
        json!({ "type": "table_row", "entries": entries })
    }

    pub fn from_json(value: &Value) -> Result<Self, JsonError> {
        let object = as_object(value)?;
        expect_kind(object, "table_row")?;
        let entries = as_array(require(object, "entries")?)?;
        Ok(TableRow {
            entries: entries
                .iter()
                .map(TableEntry::from_json)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TableEntry {
    pub fn to_json(&self) -> Value {
        json!({ "type": "table_entry", "content": inlines_to_json(&self.content) })
    }

    pub fn from_json(value: &Value) -> Result<Self, JsonError> {
        let object = as_object(value)?;
        expect_kind(object, "table_entry")?;
        Ok(TableEntry {
            content: inlines_from_json(object)?,
        })
    }
}

impl Document {
    /// Serialize the whole document: blocks plus the reference table.
    pub fn to_json(&self) -> Value {
        let blocks: Vec<Value> = self.blocks.iter().map(Block::to_json).collect();
        let mut references = Map::new();
        let mut names: Vec<&String> = self.references.keys().collect();
        names.sort();
        for name in names {
            let reference = &self.references[name];
            let value = match &reference.tooltip {
                Some(tooltip) => json!({ "url": reference.url, "tooltip": tooltip }),
                None => json!({ "url": reference.url }),
            };
            references.insert(name.clone(), value);
        }
        json!({ "blocks": blocks, "references": references })
    }

    pub fn from_json(value: &Value) -> Result<Self, JsonError> {
        let object = as_object(value)?;
        let blocks = as_array(require(object, "blocks")?)?;
        let references = match require(object, "references")? {
            Value::Object(references) => references,
            other => return Err(JsonError(format!("expected object, got {other}"))),
        };
        let mut document = Document::new();
        for block in blocks {
            document.push(Block::from_json(block)?);
        }
        for (name, value) in references {
            let object = as_object(value)?;
            let reference = Reference::new(
                get_str(object, "url")?,
                match object.get("tooltip") {
                    Some(value) => Some(as_str(value)?.to_string()),
                    None => None,
                },
            );
            document.set_reference(name, reference);
        }
        Ok(document)
    }
}

fn inlines_to_json(content: &[Inline]) -> Vec<Value> {
    content.iter().map(Inline::to_json).collect()
}

fn container_to_json(kind: &str, content: &[Inline]) -> Value {
    json!({ "type": kind, "content": inlines_to_json(content) })
}

fn link_to_json(
    kind: &str,
    url: &str,
    content: &[Inline],
    tooltip: &Option<String>,
    ref_name: &str,
) -> Value {
    let mut object = Map::new();
    object.insert("type".to_string(), json!(kind));
    object.insert("url".to_string(), json!(url));
    object.insert("content".to_string(), Value::Array(inlines_to_json(content)));
    if let Some(tooltip) = tooltip {
        object.insert("tooltip".to_string(), json!(tooltip));
    }
    if !ref_name.is_empty() {
        object.insert("ref".to_string(), json!(ref_name));
    }
    Value::Object(object)
}

type LinkParts = (String, Vec<Inline>, Option<String>, String);

fn link_from_json(object: &Map<String, Value>) -> Result<LinkParts, JsonError> {
    Ok((
        get_str(object, "url")?.to_string(),
        inlines_from_json(object)?,
        match object.get("tooltip") {
            Some(value) => Some(as_str(value)?.to_string()),
            None => None,
        },
        match object.get("ref") {
            Some(value) => as_str(value)?.to_ascii_lowercase(),
            None => String::new(),
        },
    ))
}

fn inlines_from_json(object: &Map<String, Value>) -> Result<Vec<Inline>, JsonError> {
    let content = as_array(require(object, "content")?)?;
    content.iter().map(Inline::from_json).collect()
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, JsonError> {
    value
        .as_object()
        .ok_or_else(|| JsonError(format!("expected object, got {value}")))
}

fn as_array(value: &Value) -> Result<&Vec<Value>, JsonError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(JsonError(format!("expected array, got {other}"))),
    }
}

fn as_str(value: &Value) -> Result<&str, JsonError> {
    value
        .as_str()
        .ok_or_else(|| JsonError(format!("expected string, got {value}")))
}

fn as_bool(value: &Value) -> Result<bool, JsonError> {
    value
        .as_bool()
        .ok_or_else(|| JsonError(format!("expected bool, got {value}")))
}

fn as_u64(value: &Value) -> Result<u64, JsonError> {
    value
        .as_u64()
        .ok_or_else(|| JsonError(format!("expected unsigned integer, got {value}")))
}

fn require<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a Value, JsonError> {
    object
        .get(key)
        .ok_or_else(|| JsonError(format!("missing field '{key}'")))
}

fn get_str<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a str, JsonError> {
    as_str(require(object, key)?)
}

fn expect_kind(object: &Map<String, Value>, kind: &str) -> Result<(), JsonError> {
    let found = get_str(object, "type")?;
    if found == kind {
        Ok(())
    } else {
        Err(JsonError(format!("expected kind '{kind}', got '{found}'")))
    }
}
