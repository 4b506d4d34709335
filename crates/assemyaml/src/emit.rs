//! output of rendered documents
//!
//! YAML is written in block style straight from the [Node] tree, so every tag and every
//! repeated key of `!!omap`/`!!pairs` survives. Tags the reader resolves on its own (`!!str`,
//! `!!int`, `!!map` ...) are left out. A string is written plain only when it reads back as a
//! string under the YAML 1.1 rules of [scalar]; `'yes'`, `'1_000'` or `'2001-12-14'` are
//! double quoted. A core scalar whose text does not resolve to its tag keeps its tag
//! (`!!int 0o17`).
//!
//! JSON has no tags, [Node]'s [serde::Serialize] impl maps everything onto plain JSON:
//! - `!!set` becomes an array of its members
//! - `!!omap` and `!!pairs` become arrays of `[key, value]` arrays
//! - `!!binary` and `!!timestamp` become strings
//! - mapping keys are written as strings
//! - unrecognized tags are dropped, the value is written by shape
use crate::node::{Content, Node, Tag, YAML_NS};
use crate::scalar;
use serde::ser::{SerializeMap, SerializeSeq, SerializeTuple};
use serde::{Serialize, Serializer};
use std::io::Write;

#[derive(thiserror::Error, Debug)]
pub enum EmitError {
    #[error("Unable to write json output")]
    Json(#[from] serde_json::Error),
    #[error("IO error")]
    Io(#[from] std::io::Error),
}

/// Write `documents` as one yaml stream
pub fn write_yaml(mut writer: impl Write, documents: &[Node]) -> Result<(), EmitError> {
    let mut yaml = YamlWriter::default();
    for (index, document) in documents.iter().enumerate() {
        if index > 0 {
            yaml.out.push_str("---\n");
        }
        yaml.document(document)?;
    }

    writer.write_all(yaml.out.as_bytes())?;
    Ok(())
}

/// Write the first of `documents` as json, `null` when there is none
pub fn write_json(mut writer: impl Write, documents: &[Node]) -> Result<(), EmitError> {
    serde_json::to_writer_pretty(&mut writer, &documents.first())?;
    writeln!(writer)?;

    Ok(())
}

/// Characters a plain scalar may not start with
const INDICATORS: &str = "-?:,[]{}#&*!|>'\"%@`";

#[derive(Default)]
struct YamlWriter {
    out: String,
}

impl YamlWriter {
    fn document(&mut self, node: &Node) -> Result<(), EmitError> {
        if !is_block(node) {
            self.out.push_str(&inline(node)?);
            self.out.push('\n');
            return Ok(());
        }

        if let Some(tag) = tag_property(&node.tag) {
            self.out.push_str(&tag);
            self.out.push('\n');
        }
        self.block(node, 0)
    }

    /// Write `node` after a `-`, `?` or `key:` indicator
    fn value(&mut self, node: &Node, indent: usize) -> Result<(), EmitError> {
        if !is_block(node) {
            self.out.push(' ');
            self.out.push_str(&inline(node)?);
            self.out.push('\n');
            return Ok(());
        }

        if let Some(tag) = tag_property(&node.tag) {
            self.out.push(' ');
            self.out.push_str(&tag);
        }
        self.out.push('\n');
        self.block(node, indent)
    }

    /// Entries of a non-empty collection, one per line
    fn block(&mut self, node: &Node, indent: usize) -> Result<(), EmitError> {
        match &node.content {
            Content::Scalar(_) => Ok(()),
            Content::Sequence(items) => {
                for item in items {
                    self.indent(indent);
                    self.out.push('-');
                    self.value(item, indent + 2)?;
                }
                Ok(())
            }
            // a sequence of single-entry mappings
            Content::Pairs(pairs) if matches!(node.tag, Tag::Omap | Tag::Pairs) => {
                for (key, value) in pairs {
                    self.indent(indent);
                    self.out.push_str("-\n");
                    self.entry(key, value, indent + 2)?;
                }
                Ok(())
            }
            Content::Pairs(pairs) => {
                for (key, value) in pairs {
                    self.entry(key, value, indent)?;
                }
                Ok(())
            }
        }
    }

    fn entry(&mut self, key: &Node, value: &Node, indent: usize) -> Result<(), EmitError> {
        self.indent(indent);
        if key.is_scalar() {
            self.out.push_str(&inline(key)?);
        } else {
            self.out.push('?');
            self.value(key, indent + 2)?;
            self.indent(indent);
        }
        self.out.push(':');
        self.value(value, indent + 2)
    }

    fn indent(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat(' ').take(indent));
    }
}

/// Scalars and empty collections fit on the line of their indicator
fn is_block(node: &Node) -> bool {
    match &node.content {
        Content::Scalar(_) => false,
        Content::Sequence(items) => !items.is_empty(),
        Content::Pairs(pairs) => !pairs.is_empty(),
    }
}

fn inline(node: &Node) -> Result<String, EmitError> {
    let empty = match &node.content {
        Content::Scalar(text) => return scalar_text(&node.tag, text),
        Content::Sequence(_) => "[]",
        Content::Pairs(_) if matches!(node.tag, Tag::Omap | Tag::Pairs) => "[]",
        Content::Pairs(_) => "{}",
    };

    Ok(match tag_property(&node.tag) {
        Some(tag) => format!("{tag} {empty}"),
        None => empty.to_string(),
    })
}

/// Tag written in front of a node, [None] for tags a reader resolves by itself
fn tag_property(tag: &Tag) -> Option<String> {
    match tag {
        Tag::Null
        | Tag::Bool
        | Tag::Int
        | Tag::Float
        | Tag::Str
        | Tag::Timestamp
        | Tag::Seq
        | Tag::Map => None,
        Tag::Custom(uri) if uri.starts_with('!') => Some(uri.clone()),
        Tag::Custom(uri) if !uri.starts_with(YAML_NS) => Some(format!("!<{uri}>")),
        tag => Some(tag.simplified()),
    }
}

fn scalar_text(tag: &Tag, text: &str) -> Result<String, EmitError> {
    Ok(match tag {
        Tag::Null => "null".to_string(),
        Tag::Str => string(text, true)?,
        Tag::Bool | Tag::Int | Tag::Float | Tag::Timestamp if scalar::resolve_plain(text) == *tag => {
            text.to_string()
        }
        Tag::Binary => format!("{tag} {}", string(&scalar::binary_value(text), false)?),
        _ => match tag_property(tag) {
            Some(property) => format!("{property} {}", string(text, false)?),
            None => format!("{tag} {}", string(text, false)?),
        },
    })
}

/// Plain when the text reads back unchanged, double quoted otherwise
///
/// `untagged` text must also resolve to `!!str` to be written plain.
fn string(text: &str, untagged: bool) -> Result<String, EmitError> {
    if is_plain(text) && (!untagged || scalar::resolve_plain(text) == Tag::Str) {
        return Ok(text.to_string());
    }

    // json string escapes are valid in double quoted yaml
    Ok(serde_json::to_string(text)?)
}

fn is_plain(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };

    !INDICATORS.contains(first)
        && !first.is_whitespace()
        && !text.ends_with(char::is_whitespace)
        && !text.ends_with(':')
        && !text.starts_with("...")
        && !text.contains(": ")
        && !text.contains(" #")
        && !matches!(text, "<<" | "=")
        && !text
            .chars()
            .any(|c| c.is_control() || matches!(c, ',' | '[' | ']' | '{' | '}'))
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match (&self.tag, &self.content) {
            (Tag::Null, _) => serializer.serialize_unit(),
            (Tag::Bool, Content::Scalar(text)) => match scalar::bool_value(text) {
                Some(value) => serializer.serialize_bool(value),
                None => serializer.serialize_str(text),
            },
            (Tag::Int, Content::Scalar(text)) => match scalar::int_value(text) {
                Some(value) => match i64::try_from(value) {
                    Ok(value) => serializer.serialize_i64(value),
                    Err(_) => serializer.serialize_i128(value),
                },
                None => serializer.serialize_str(text),
            },
            (Tag::Float, Content::Scalar(text)) => match scalar::float_value(text) {
                Some(value) => serializer.serialize_f64(value),
                None => serializer.serialize_str(text),
            },
            (Tag::Binary, Content::Scalar(text)) => {
                serializer.serialize_str(&scalar::binary_value(text))
            }
            (_, Content::Scalar(text)) => serializer.serialize_str(text),
            (Tag::Set, Content::Pairs(pairs)) => {
                let mut ser = serializer.serialize_seq(Some(pairs.len()))?;
                for (member, _) in pairs {
                    ser.serialize_element(member)?;
                }
                ser.end()
            }
            (Tag::Omap | Tag::Pairs, Content::Pairs(pairs)) => {
                let mut ser = serializer.serialize_seq(Some(pairs.len()))?;
                for (key, value) in pairs {
                    ser.serialize_element(&Entry(key, value))?;
                }
                ser.end()
            }
            (_, Content::Sequence(items)) => {
                let mut ser = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    ser.serialize_element(item)?;
                }
                ser.end()
            }
            (_, Content::Pairs(pairs)) => {
                let mut ser = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    ser.serialize_entry(&json_key(key), value)?;
                }
                ser.end()
            }
        }
    }
}

/// A `[key, value]` array
struct Entry<'n>(&'n Node, &'n Node);

impl Serialize for Entry<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_tuple(2)?;
        ser.serialize_element(self.0)?;
        ser.serialize_element(self.1)?;
        ser.end()
    }
}

/// Json object keys are strings, collections are written in flow style
fn json_key(key: &Node) -> String {
    let text = key.as_scalar().unwrap_or_default();
    match &key.tag {
        Tag::Null => "null".to_string(),
        Tag::Bool => scalar::bool_value(text).map_or_else(|| text.to_string(), |v| v.to_string()),
        Tag::Int => scalar::int_value(text).map_or_else(|| text.to_string(), |v| v.to_string()),
        Tag::Float => scalar::float_value(text).map_or_else(|| text.to_string(), |v| v.to_string()),
        _ if key.is_scalar() => text.to_string(),
        _ => key.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compose::compose;
    use crate::equality::nodes_equal;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn json_of(text: &str) -> serde_json::Value {
        let documents = compose(text, None).unwrap();
        let mut out = vec![];
        write_json(&mut out, &documents).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    fn yaml_of(text: &str) -> String {
        let documents = compose(text, None).unwrap();
        let mut out = vec![];
        write_yaml(&mut out, &documents).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn yaml_round_trip(text: &str) -> Vec<Node> {
        compose(&yaml_of(text), None).unwrap()
    }

    #[test]
    fn json_core_types() {
        assert_eq!(
            json_of("{a: 1, b: 0x10, c: 1.5, d: yes, e: ~, f: text, g: '2', h: [x]}"),
            json!({"a": 1, "b": 16, "c": 1.5, "d": true, "e": null, "f": "text", "g": "2", "h": ["x"]})
        );
    }

    #[test]
    fn json_collections_without_a_json_equivalent() {
        assert_eq!(json_of("!!set {a, b}"), json!(["a", "b"]));
        assert_eq!(json_of("!!omap [b: 1, a: 2]"), json!([["b", 1], ["a", 2]]));
        assert_eq!(json_of("!!pairs [a: 1, a: 2]"), json!([["a", 1], ["a", 2]]));
    }

    #[test]
    fn json_keys_are_strings() {
        assert_eq!(json_of("{1: a, true: b, ~: c}"), json!({"1": "a", "true": "b", "null": "c"}));
        assert_eq!(json_of("? [a, b]\n: c\n"), json!({"[a, b]": "c"}));
    }

    #[test]
    fn json_custom_tags_by_shape() {
        assert_eq!(
            json_of("{Bucket: !Ref Name, List: !Split [',', 'a,b']}"),
            json!({"Bucket": "Name", "List": [",", "a,b"]})
        );
    }

    #[test]
    fn json_first_document_only() {
        assert_eq!(json_of("a: 1\n---\nb: 2\n"), json!({"a": 1}));
        assert_eq!(json_of(""), json!(null));
    }

    #[test]
    fn yaml_keeps_types() {
        let text = "\
a: 1
b: 1.5
c: true
d: ~
e: '42'
f: [x, y]
g: !!set {m, n}
h: !!omap [z: 1, y: 2]
i: !Ref Bucket
j: !GetAtt [Bucket, Arn]
k: !!binary R0lGODlh
l: !!int 0o17
";
        let round_trip = yaml_round_trip(text);

        assert_eq!(round_trip.len(), 1);
        let expected = compose(text, None).unwrap().remove(0);
        assert!(nodes_equal(&expected, &round_trip[0]), "{}", round_trip[0]);
        assert_eq!(round_trip[0].get("g").unwrap().tag, Tag::Set);
        assert_eq!(round_trip[0].get("h").unwrap().tag, Tag::Omap);
        assert_eq!(round_trip[0].get("i").unwrap().tag, Tag::Custom("!Ref".into()));
        assert_eq!(round_trip[0].get("k").unwrap().tag, Tag::Binary);
        assert_eq!(round_trip[0].get("l").unwrap().tag, Tag::Int);
    }

    #[test]
    fn yaml_block_layout() {
        let text = "\
a: [x, 'yes']
b: !Ref Bucket
c: !!set {m}
d: !!pairs [k: 1, k: 2]
e: {}
? [1, 2]
: !GetAtt [Bucket, Arn]
";
        assert_eq!(
            yaml_of(text),
            "\
a:
  - x
  - \"yes\"
b: !Ref Bucket
c: !!set
  m: null
d: !!pairs
  -
    k: 1
  -
    k: 2
e: {}
?
  - 1
  - 2
: !GetAtt
  - Bucket
  - Arn
"
        );
    }

    #[test]
    fn yaml_quotes_strings_that_would_change_type() {
        let strings = [
            "yes", "No", "~", "null", "1:30", "1_000", "2001-12-14", "0b101", ".inf", "-1.5", "",
            " padded", "a: b", "- dash", "#hash", "<<", "x,y", "line\nbreak", "AWS::S3::Bucket",
        ];
        let text = strings
            .iter()
            .map(|s| format!("- {}\n", serde_json::to_string(s).unwrap()))
            .collect::<String>();

        let round_trip = yaml_round_trip(&text);

        let items = round_trip[0].as_sequence().unwrap();
        assert_eq!(items.len(), strings.len());
        for (item, expected) in items.iter().zip(strings) {
            assert_eq!(item.tag, Tag::Str, "{expected:?} came back as {item}");
            assert_eq!(item.as_scalar(), Some(expected));
        }
        assert_eq!(
            yaml_of("- AWS::S3::Bucket\n- '1_000'\n"),
            "- AWS::S3::Bucket\n- \"1_000\"\n"
        );
    }

    #[test]
    fn yaml_keeps_repeated_keys_of_custom_tags() {
        let round_trip = yaml_round_trip("!Foo {a: 1, a: 2}");
        assert_eq!(round_trip[0].tag, Tag::Custom("!Foo".into()));
        assert_eq!(round_trip[0].to_string(), "{a: 1, a: 2}");

        let pairs = yaml_round_trip("!!pairs [a: 1, a: 2]");
        assert_eq!(pairs[0].as_pairs().unwrap().len(), 2);
    }

    #[test]
    fn yaml_global_tags_are_verbatim() {
        let yaml = yaml_of("!<tag:example.com,2000:thing> x");
        assert_eq!(yaml, "!<tag:example.com,2000:thing> x\n");
    }

    #[test]
    fn yaml_multiple_documents() {
        let round_trip = yaml_round_trip("a: 1\n---\n- b\n");
        assert_eq!(round_trip.len(), 2);
        assert_eq!(round_trip[1].to_string(), "[b]");
    }
}
