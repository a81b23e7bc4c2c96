//! Document-level JSON codec round-trips.

use marq_core::{parse, Document, ParseOptions};
use serde_json::Value;

fn assert_json_round_trip(source: &str, options: &ParseOptions) {
    let doc = parse(source, options);
    let value = doc.to_json();
    let decoded = Document::from_json(&value).expect("decode succeeds");
    assert_eq!(doc, decoded);
}

#[test]
fn test_kitchen_sink_round_trip() {
    let options = ParseOptions::default()
        .with_latex(true)
        .with_emoji_dictionary(["smile"]);
    let source = "\
# Title

para with *em*, **bold**, __u__, ~~s~~, ==h==, ||sp||, `c`, $x$, :smile:

- [x] done
    - nested
4. four

> quoted

| A | B |
| :-- | -: |
| 1 | 2 |

[[ToC]]

---

```rust
fn main() {}
```

see [site][home]

[home]: https://ex.com \"Home\"
";
    assert_json_round_trip(source, &options);
}

#[test]
fn test_plain_text_is_bare_string_in_json() {
    let doc = parse("just text", &ParseOptions::default());
    let value = doc.to_json();
    let content = &value["blocks"][0]["content"];
    assert_eq!(content[0], Value::String("just text".to_string()));
}

#[test]
fn test_block_kinds_are_tagged() {
    let doc = parse("# H\n\ntext\n\n---\n", &ParseOptions::default());
    let value = doc.to_json();
    let kinds: Vec<&str> = value["blocks"]
        .as_array()
        .expect("blocks array")
        .iter()
        .map(|block| block["type"].as_str().expect("tagged"))
        .collect();
    assert_eq!(kinds, vec!["heading", "paragraph", "horizontal_rule"]);
}

#[test]
fn test_references_serialized() {
    let doc = parse("[a]: /a\n\n[b]: /b \"B\"\n", &ParseOptions::default());
    let value = doc.to_json();
    assert_eq!(value["references"]["a"]["url"], "/a");
    assert_eq!(value["references"]["b"]["tooltip"], "B");
    assert_eq!(Document::from_json(&value).expect("decode"), doc);
}

#[test]
fn test_from_json_rejects_malformed() {
    assert!(Document::from_json(&serde_json::json!({ "blocks": [] })).is_err());
    assert!(Document::from_json(&serde_json::json!({
        "blocks": [{ "type": "nonsense" }],
        "references": {},
    }))
    .is_err());
}
