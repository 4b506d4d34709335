//! document tree model
//!
//! A composed YAML document is a tree of [Node]s. Every node carries
//! - a [Tag] (its type identity)
//! - its [Content] (a scalar text, a list of child nodes or a list of key/value pairs)
//! - the [Mark]s where it starts and ends in the source
//!
//! The shape of the content follows from the tag:
//!
//! | tag                                                   | content              |
//! |-------------------------------------------------------|----------------------|
//! | `!!null` `!!bool` `!!int` `!!float` `!!str` `!!binary` `!!timestamp` | [Content::Scalar] |
//! | `!!seq`                                               | [Content::Sequence]  |
//! | `!!map` `!!set` `!!omap` `!!pairs`                    | [Content::Pairs]     |
//! | anything else                                         | whatever was written |
//!
//! Sets use a `!!null` value for each member. Marks are diagnostics only and are never compared.
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Namespace of the core YAML tags
pub const YAML_NS: &str = "tag:yaml.org,2002:";

/// Type identity of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Binary,
    Timestamp,
    Seq,
    Map,
    Set,
    Omap,
    Pairs,
    /// Any tag without a dedicated meaning, stored in its resolved form (`!Ref`, `tag:example.com,2000:x`)
    Custom(String),
}

/// The content shape a tag demands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Sequence,
    Pairs,
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Scalar => f.write_str("scalar"),
            Shape::Sequence => f.write_str("sequence"),
            Shape::Pairs => f.write_str("mapping"),
        }
    }
}

impl Tag {
    /// Resolve a fully expanded tag
    pub fn from_uri(uri: &str) -> Tag {
        let Some(core) = uri.strip_prefix(YAML_NS) else {
            return Tag::Custom(uri.to_string());
        };

        match core {
            "null" => Tag::Null,
            "bool" => Tag::Bool,
            "int" => Tag::Int,
            "float" => Tag::Float,
            "str" => Tag::Str,
            "binary" => Tag::Binary,
            "timestamp" => Tag::Timestamp,
            "seq" => Tag::Seq,
            "map" => Tag::Map,
            "set" => Tag::Set,
            "omap" => Tag::Omap,
            "pairs" => Tag::Pairs,
            _ => Tag::Custom(uri.to_string()),
        }
    }

    /// Fully expanded form of the tag
    pub fn uri(&self) -> String {
        match self {
            Tag::Custom(uri) => uri.clone(),
            tag => format!("{YAML_NS}{}", tag.core_name().unwrap_or_default()),
        }
    }

    fn core_name(&self) -> Option<&'static str> {
        Some(match self {
            Tag::Null => "null",
            Tag::Bool => "bool",
            Tag::Int => "int",
            Tag::Float => "float",
            Tag::Str => "str",
            Tag::Binary => "binary",
            Tag::Timestamp => "timestamp",
            Tag::Seq => "seq",
            Tag::Map => "map",
            Tag::Set => "set",
            Tag::Omap => "omap",
            Tag::Pairs => "pairs",
            Tag::Custom(_) => return None,
        })
    }

    /// Short form used in messages: `tag:yaml.org,2002:seq` becomes `!!seq`
    pub fn simplified(&self) -> String {
        match self {
            Tag::Custom(uri) => match uri.strip_prefix(YAML_NS) {
                Some(rest) => format!("!!{rest}"),
                None => uri.clone(),
            },
            tag => format!("!!{}", tag.core_name().unwrap_or_default()),
        }
    }

    /// Content shape demanded by this tag, [None] for custom tags
    pub fn shape(&self) -> Option<Shape> {
        match self {
            Tag::Null
            | Tag::Bool
            | Tag::Int
            | Tag::Float
            | Tag::Str
            | Tag::Binary
            | Tag::Timestamp => Some(Shape::Scalar),
            Tag::Seq => Some(Shape::Sequence),
            Tag::Map | Tag::Set | Tag::Omap | Tag::Pairs => Some(Shape::Pairs),
            Tag::Custom(_) => None,
        }
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.simplified())
    }
}

/// Position in a source stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mark {
    /// Name of the stream (usually a file path)
    pub source: Option<Arc<str>>,
    /// Byte offset (0-based)
    pub index: usize,
    /// Line (1-based)
    pub line: usize,
    /// Column (1-based)
    pub column: usize,
}

impl Mark {
    pub fn new(source: Option<Arc<str>>, index: usize, line: usize, column: usize) -> Self {
        Self {
            source,
            index,
            line,
            column,
        }
    }
}

impl Display for Mark {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let source = self.source.as_deref().unwrap_or("<input>");
        write!(f, "{source}:{}:{}", self.line, self.column)
    }
}

/// Payload of a node
#[derive(Debug, Clone)]
pub enum Content {
    Scalar(String),
    Sequence(Vec<Node>),
    /// Ordered key/value pairs of mappings, sets, ordered maps and pairs
    Pairs(Vec<(Node, Node)>),
}

impl Content {
    pub fn shape(&self) -> Shape {
        match self {
            Content::Scalar(_) => Shape::Scalar,
            Content::Sequence(_) => Shape::Sequence,
            Content::Pairs(_) => Shape::Pairs,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub tag: Tag,
    pub content: Content,
    pub start: Mark,
    pub end: Mark,
}

impl Node {
    pub fn new(tag: Tag, content: Content, start: Mark) -> Self {
        Self {
            tag,
            content,
            end: start.clone(),
            start,
        }
    }

    pub fn scalar(tag: Tag, text: impl Into<String>, start: Mark) -> Self {
        Self::new(tag, Content::Scalar(text.into()), start)
    }

    pub fn null(start: Mark) -> Self {
        Self::scalar(Tag::Null, "", start)
    }

    pub fn sequence(tag: Tag, items: Vec<Node>, start: Mark) -> Self {
        Self::new(tag, Content::Sequence(items), start)
    }

    pub fn mapping(tag: Tag, pairs: Vec<(Node, Node)>, start: Mark) -> Self {
        Self::new(tag, Content::Pairs(pairs), start)
    }

    pub fn with_end(mut self, end: Mark) -> Self {
        self.end = end;
        self
    }

    pub fn is_null(&self) -> bool {
        self.tag == Tag::Null
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.content, Content::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match &self.content {
            Content::Scalar(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.content {
            Content::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_pairs(&self) -> Option<&[(Node, Node)]> {
        match &self.content {
            Content::Pairs(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Look up the value of a scalar key in a mapping-shaped node
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_pairs()?
            .iter()
            .find(|(k, _)| k.as_scalar() == Some(key))
            .map(|(_, value)| value)
    }

    /// Rebuild this node with `f` applied to every direct child (keys included)
    pub fn try_map_children<E>(
        self,
        mut f: impl FnMut(Node) -> Result<Node, E>,
    ) -> Result<Node, E> {
        let Node {
            tag,
            content,
            start,
            end,
        } = self;

        let content = match content {
            Content::Scalar(text) => Content::Scalar(text),
            Content::Sequence(items) => {
                Content::Sequence(items.into_iter().map(&mut f).collect::<Result<_, E>>()?)
            }
            Content::Pairs(pairs) => Content::Pairs(
                pairs
                    .into_iter()
                    .map(|(key, value)| Ok((f(key)?, f(value)?)))
                    .collect::<Result<_, E>>()?,
            ),
        };

        Ok(Node {
            tag,
            content,
            start,
            end,
        })
    }
}

/// Compact flow-style rendering, used in messages
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.content {
            Content::Scalar(text) => f.write_str(text),
            Content::Sequence(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Content::Pairs(pairs) => {
                f.write_str("{")?;
                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    if self.tag == Tag::Set {
                        write!(f, "{key}")?;
                    } else {
                        write!(f, "{key}: {value}")?;
                    }
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn string(text: &str) -> Node {
        Node::scalar(Tag::Str, text, Mark::default())
    }

    #[test]
    fn core_tags_round_trip_through_uri() {
        for tag in [Tag::Null, Tag::Int, Tag::Set, Tag::Omap, Tag::Timestamp] {
            assert_eq!(Tag::from_uri(&tag.uri()), tag);
        }
        assert_eq!(
            Tag::from_uri("tag:yaml.org,2002:merge"),
            Tag::Custom("tag:yaml.org,2002:merge".into())
        );
    }

    #[test]
    fn simplified_tags() {
        assert_eq!(Tag::Seq.simplified(), "!!seq");
        assert_eq!(Tag::Custom("!Ref".into()).simplified(), "!Ref");
        assert_eq!(
            Tag::Custom("tag:yaml.org,2002:merge".into()).simplified(),
            "!!merge"
        );
        assert_eq!(
            Tag::Custom("tag:assemyaml.nz,2017:Assembly".into()).to_string(),
            "tag:assemyaml.nz,2017:Assembly"
        );
    }

    #[test]
    fn mark_display() {
        let mark = Mark::new(Some("resource.yml".into()), 12, 2, 5);
        assert_eq!(mark.to_string(), "resource.yml:2:5");
        assert_eq!(Mark::default().to_string(), "<input>:0:0");
    }

    #[test]
    fn flow_display() {
        let node = Node::mapping(
            Tag::Map,
            vec![(
                string("a"),
                Node::sequence(Tag::Seq, vec![string("b"), string("c")], Mark::default()),
            )],
            Mark::default(),
        );
        assert_eq!(node.to_string(), "{a: [b, c]}");
    }

    #[test]
    fn map_children_visits_keys_and_values() {
        let node = Node::mapping(Tag::Map, vec![(string("a"), string("b"))], Mark::default());
        let mut seen = vec![];
        let node = node
            .try_map_children(|child| {
                seen.push(child.to_string());
                Ok::<_, ()>(string("x"))
            })
            .unwrap();

        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(node.to_string(), "{x: x}");
        assert_eq!(node.get("x").map(ToString::to_string), Some("x".into()));
    }
}
