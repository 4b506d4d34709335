//! structural merge of two nodes
//!
//! Used whenever two values meet under the same name: two assemblies of the same name, or the
//! payload of a transclude marker and the assembly it refers to.
//!
//! | `a`             | `b`                        | result                                       |
//! |-----------------|----------------------------|----------------------------------------------|
//! | `!!null`        | anything                   | `b`                                          |
//! | anything        | `!!null`                   | `a`                                          |
//! | scalar          | anything                   | error                                        |
//! | `!!seq`         | `!!seq`                    | items of `a`, then items of `b`              |
//! | `!!map`         | `!!map`                    | entries of `a`, then `b`; duplicate keys fail |
//! | `!!set`         | `!!set`                    | members of `a`, then new members of `b`      |
//! | `!!omap`/`!!pairs` | same tag                | pairs of `a`, then pairs of `b`              |
//! | custom tag      | same tag, same shape       | by shape, duplicate mapping keys fail        |
//!
//! Anything else is an incompatibility. Merging never rewrites an entry that already exists,
//! the later document has to use another name instead.
use crate::equality::nodes_equal;
use crate::error::{Error, Result};
use crate::node::{Content, Node, Shape, Tag};

/// How keys of `b` that already exist in `a` are treated
#[derive(Debug, Clone, Copy)]
enum Keys {
    Unique,
    Deduplicate,
    Repeat,
}

pub fn merge_nodes(a: Node, b: Node) -> Result<Node> {
    if a.is_null() {
        return Ok(b);
    }
    if b.is_null() {
        return Ok(a);
    }

    match &a.tag {
        Tag::Null => Ok(b),
        Tag::Bool | Tag::Int | Tag::Float | Tag::Str | Tag::Binary | Tag::Timestamp => {
            Err(incompatible(&a, &b))
        }
        Tag::Seq => concat_sequences(a, b),
        Tag::Map => concat_pairs(a, b, Keys::Unique),
        Tag::Set => concat_pairs(a, b, Keys::Deduplicate),
        Tag::Omap | Tag::Pairs => concat_pairs(a, b, Keys::Repeat),
        Tag::Custom(_) => match a.content.shape() {
            Shape::Scalar => Err(incompatible(&a, &b)),
            Shape::Sequence => concat_sequences(a, b),
            Shape::Pairs => concat_pairs(a, b, Keys::Unique),
        },
    }
}

fn incompatible(a: &Node, b: &Node) -> Error {
    Error::MergeIncompatible {
        found: b.tag.simplified(),
        found_mark: b.start.clone(),
        existing: a.tag.simplified(),
        existing_mark: a.start.clone(),
    }
}

fn shape_mismatch(node: &Node, expected: Shape) -> Error {
    Error::Internal {
        tag: node.tag.simplified(),
        reason: format!("expected {expected} content, found {}", node.content.shape()),
        mark: node.start.clone(),
    }
}

fn concat_sequences(a: Node, b: Node) -> Result<Node> {
    if b.tag != a.tag {
        return Err(incompatible(&a, &b));
    }

    let Node {
        tag,
        content,
        start,
        end,
    } = a;

    let (Content::Sequence(mut items), Content::Sequence(more)) = (content, b.content) else {
        return Err(Error::Internal {
            tag: tag.simplified(),
            reason: "sequence merge of non-sequence content".into(),
            mark: start,
        });
    };

    items.extend(more);
    Ok(Node::sequence(tag, items, start).with_end(end))
}

fn concat_pairs(a: Node, b: Node, keys: Keys) -> Result<Node> {
    if b.tag != a.tag {
        return Err(incompatible(&a, &b));
    }

    for node in [&a, &b] {
        if !matches!(node.content, Content::Pairs(_)) {
            return Err(shape_mismatch(node, Shape::Pairs));
        }
    }

    let Node {
        tag,
        content,
        start,
        end,
    } = a;
    let (Content::Pairs(mut pairs), Content::Pairs(incoming)) = (content, b.content) else {
        return Err(Error::Internal {
            tag: tag.simplified(),
            reason: "mapping merge of non-mapping content".into(),
            mark: start,
        });
    };

    let existing = pairs.len();
    for (key, value) in incoming {
        let duplicate = match keys {
            Keys::Repeat => None,
            Keys::Unique | Keys::Deduplicate => pairs[..existing]
                .iter()
                .find(|(existing_key, _)| nodes_equal(existing_key, &key))
                .map(|(existing_key, _)| existing_key.start.clone()),
        };

        match (duplicate, keys) {
            (Some(existing_mark), Keys::Unique) => {
                return Err(Error::DuplicateKey {
                    key: key.to_string(),
                    key_mark: key.start.clone(),
                    existing_mark,
                });
            }
            (Some(_), _) => tracing::trace!(%key, "dropping repeated set member"),
            (None, _) => pairs.push((key, value)),
        }
    }

    Ok(Node::mapping(tag, pairs, start).with_end(end))
}
