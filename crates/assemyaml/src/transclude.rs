//! resolve transclude markers against an [AssemblyTable]
//!
//! The template is walked top down. A `!Transclude Name: payload` marker is replaced by the
//! payload merged with the assembly `Name` (payload first), and the walk continues inside the
//! replacement so that assemblies may transclude other assemblies.
//!
//! Children that came from the assembly are walked as part of the expansion of `Name`; a
//! `!Transclude Name` met there is a cycle. Children from the payload are template content and
//! may use the same name again.
use crate::assemble::AssemblyTable;
use crate::error::{Error, Result};
use crate::marker::{split_marker, MarkerKind, Split};
use crate::merge::merge_nodes;
use crate::node::{Content, Node};

/// Replace every transclude marker of `node`
pub fn transclude(node: Node, table: &AssemblyTable, local_tags: bool) -> Result<Node> {
    Transcluder::new(table, local_tags).resolve(node)
}

struct Transcluder<'t> {
    table: &'t AssemblyTable,
    local_tags: bool,
    /// names currently being expanded, innermost last
    expanding: Vec<String>,
}

impl<'t> Transcluder<'t> {
    fn new(table: &'t AssemblyTable, local_tags: bool) -> Self {
        Self {
            table,
            local_tags,
            expanding: vec![],
        }
    }

    fn resolve(&mut self, node: Node) -> Result<Node> {
        if node.is_scalar() {
            return Ok(node);
        }

        let point = match split_marker(node, MarkerKind::Transclude, self.local_tags)? {
            Split::Data(node) => return node.try_map_children(|child| self.resolve(child)),
            Split::Marker(point) => point,
        };

        if self.expanding.contains(&point.name) {
            return Err(Error::RecursiveTransclusion {
                name: point.name,
                mark: point.start,
            });
        }

        // merged children start with the payload's own
        let own = if point.payload.is_null() {
            0
        } else {
            children(&point.payload)
        };

        let value = match self.table.get(&point.name) {
            Some(assembly) => merge_nodes(point.payload, assembly.clone())?,
            None => {
                tracing::debug!(name = %point.name, "no assembly, keeping the payload");
                point.payload
            }
        };
        tracing::debug!(name = %point.name, %value, "transcluded");

        if value.is_scalar() {
            return Ok(value);
        }

        let Node {
            tag,
            content,
            start,
            end,
        } = value;

        let content = match content {
            Content::Scalar(text) => Content::Scalar(text),
            Content::Sequence(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    resolved.push(self.resolve_within(item, &point.name, index >= own)?);
                }
                Content::Sequence(resolved)
            }
            Content::Pairs(pairs) => {
                let mut resolved = Vec::with_capacity(pairs.len());
                for (index, (key, item)) in pairs.into_iter().enumerate() {
                    let inherited = index >= own;
                    resolved.push((
                        self.resolve_within(key, &point.name, inherited)?,
                        self.resolve_within(item, &point.name, inherited)?,
                    ));
                }
                Content::Pairs(resolved)
            }
        };

        Ok(Node {
            tag,
            content,
            start,
            end,
        })
    }

    /// Resolve `node`, inside the expansion of `name` when it came from the assembly
    fn resolve_within(&mut self, node: Node, name: &str, inherited: bool) -> Result<Node> {
        if !inherited {
            return self.resolve(node);
        }

        self.expanding.push(name.to_string());
        let resolved = self.resolve(node);
        self.expanding.pop();

        resolved
    }
}

fn children(node: &Node) -> usize {
    match &node.content {
        Content::Scalar(_) => 0,
        Content::Sequence(items) => items.len(),
        Content::Pairs(pairs) => pairs.len(),
    }
}
