//! compose yaml streams into [Node] trees
//!
//! Builds on the event parser of [yaml_rust2]. Unlike [yaml_rust2::YamlLoader] the resulting
//! tree keeps what the merge rules need: the tag of every node (explicit or resolved), mappings
//! with arbitrary keys in document order, and source positions.
use crate::error::{Error, Result};
use crate::node::{Content, Mark, Node, Shape, Tag};
use crate::scalar;
use std::collections::HashMap;
use std::sync::Arc;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag as EventTag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Compose every document of a yaml stream
///
/// `source` names the stream in the [Mark]s of the composed nodes.
pub fn compose(text: &str, source: Option<&str>) -> Result<Vec<Node>> {
    let source: Option<Arc<str>> = source.map(Arc::from);
    let mut composer = Composer::new(source.clone());

    Parser::new_from_str(text)
        .load(&mut composer, true)
        .map_err(|err| Error::Syntax {
            message: err.info().to_string(),
            mark: mark_from(err.marker(), source),
        })?;

    composer.finish()
}

pub(crate) fn mark_from(marker: &Marker, source: Option<Arc<str>>) -> Mark {
    Mark::new(source, marker.index(), marker.line(), marker.col() + 1)
}

struct Composer {
    source: Option<Arc<str>>,
    stack: Vec<Frame>,
    /// completed anchored nodes of the current document
    anchors: HashMap<usize, Node>,
    documents: Vec<Node>,
    /// first error, events can not be rejected while the parser runs
    error: Option<Error>,
}

struct Frame {
    tag: Option<EventTag>,
    anchor: usize,
    start: Mark,
    content: FrameContent,
}

enum FrameContent {
    Sequence(Vec<Node>),
    Mapping {
        pairs: Vec<(Node, Node)>,
        key: Option<Node>,
    },
}

impl Composer {
    fn new(source: Option<Arc<str>>) -> Self {
        Self {
            source,
            stack: vec![],
            anchors: HashMap::new(),
            documents: vec![],
            error: None,
        }
    }

    fn finish(self) -> Result<Vec<Node>> {
        if let Some(err) = self.error {
            return Err(err);
        }

        tracing::trace!(source = ?self.source, documents = self.documents.len(), "composed stream");
        Ok(self.documents)
    }

    fn handle(&mut self, event: Event, mark: Mark) -> Result<()> {
        match event {
            Event::Nothing | Event::StreamStart | Event::StreamEnd | Event::DocumentEnd => {}
            Event::DocumentStart => self.anchors.clear(),
            Event::Alias(anchor) => {
                let Some(node) = self.anchors.get(&anchor).cloned() else {
                    return Err(Error::Syntax {
                        message: "found alias to a node that contains it".into(),
                        mark,
                    });
                };
                self.push(node);
            }
            Event::Scalar(text, style, anchor, tag) => {
                let tag = match tag {
                    Some(tag) => resolve_explicit(&tag, Shape::Scalar),
                    None if matches!(style, TScalarStyle::Plain) => scalar::resolve_plain(&text),
                    None => Tag::Str,
                };
                check_shape(&tag, Shape::Scalar, &mark)?;
                self.complete(Node::scalar(tag, text, mark), anchor);
            }
            Event::SequenceStart(anchor, tag) => self.stack.push(Frame {
                tag,
                anchor,
                start: mark,
                content: FrameContent::Sequence(vec![]),
            }),
            Event::MappingStart(anchor, tag) => self.stack.push(Frame {
                tag,
                anchor,
                start: mark,
                content: FrameContent::Mapping {
                    pairs: vec![],
                    key: None,
                },
            }),
            Event::SequenceEnd | Event::MappingEnd => {
                let Some(frame) = self.stack.pop() else {
                    return Err(Error::Syntax {
                        message: "collection ended without being started".into(),
                        mark,
                    });
                };
                let anchor = frame.anchor;
                let node = build_collection(frame)?.with_end(mark);
                self.complete(node, anchor);
            }
        }

        Ok(())
    }

    fn complete(&mut self, node: Node, anchor: usize) {
        if anchor != 0 {
            self.anchors.insert(anchor, node.clone());
        }
        self.push(node);
    }

    fn push(&mut self, node: Node) {
        let Some(frame) = self.stack.last_mut() else {
            self.documents.push(node);
            return;
        };

        match &mut frame.content {
            FrameContent::Sequence(items) => items.push(node),
            FrameContent::Mapping { pairs, key } => match key.take() {
                Some(key) => pairs.push((key, node)),
                None => *key = Some(node),
            },
        }
    }
}

impl MarkedEventReceiver for Composer {
    fn on_event(&mut self, event: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        let mark = mark_from(&marker, self.source.clone());
        if let Err(err) = self.handle(event, mark) {
            self.error = Some(err);
        }
    }
}

/// `!` alone is the non-specific tag and only says "not a plain scalar"
fn resolve_explicit(tag: &EventTag, shape: Shape) -> Tag {
    let uri = format!("{}{}", tag.handle, tag.suffix);
    if uri != "!" {
        return Tag::from_uri(&uri);
    }

    match shape {
        Shape::Scalar => Tag::Str,
        Shape::Sequence => Tag::Seq,
        Shape::Pairs => Tag::Map,
    }
}

fn check_shape(tag: &Tag, shape: Shape, mark: &Mark) -> Result<()> {
    match tag.shape() {
        Some(expected) if expected != shape => Err(Error::Syntax {
            message: format!("expected a {expected} for {tag}, but found a {shape}"),
            mark: mark.clone(),
        }),
        _ => Ok(()),
    }
}

fn build_collection(frame: Frame) -> Result<Node> {
    let Frame {
        tag, start, content, ..
    } = frame;

    match content {
        FrameContent::Sequence(items) => {
            let tag = tag.map_or(Tag::Seq, |tag| resolve_explicit(&tag, Shape::Sequence));
            if matches!(tag, Tag::Omap | Tag::Pairs) {
                let pairs = items
                    .into_iter()
                    .map(|item| single_pair(item, &tag))
                    .collect::<Result<_>>()?;
                return Ok(Node::mapping(tag, pairs, start));
            }

            check_shape(&tag, Shape::Sequence, &start)?;
            Ok(Node::sequence(tag, items, start))
        }
        FrameContent::Mapping { pairs, key } => {
            let tag = tag.map_or(Tag::Map, |tag| resolve_explicit(&tag, Shape::Pairs));
            if matches!(tag, Tag::Omap | Tag::Pairs) {
                return Err(Error::Syntax {
                    message: format!("expected a sequence for {tag}, but found a mapping"),
                    mark: start,
                });
            }
            if let Some(key) = key {
                return Err(Error::Syntax {
                    message: "mapping key without a value".into(),
                    mark: key.start,
                });
            }

            check_shape(&tag, Shape::Pairs, &start)?;
            Ok(Node::mapping(tag, pairs, start))
        }
    }
}

/// `!!omap` and `!!pairs` are written as a sequence of single-entry mappings
fn single_pair(item: Node, tag: &Tag) -> Result<(Node, Node)> {
    match item.content {
        Content::Pairs(mut pairs) if item.tag == Tag::Map && pairs.len() == 1 => Ok(pairs.remove(0)),
        _ => Err(Error::Syntax {
            message: format!("expected a single-entry mapping in {tag}"),
            mark: item.start,
        }),
    }
}
