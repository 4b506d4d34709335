//! collect assemblies out of documents
//!
//! Every `!Assembly Name: payload` marker found in a document is merged into the
//! [AssemblyTable] entry for `Name`. Markers nested inside a payload are collected first, so
//! an inner assembly is recorded before the outer one that contains it.
use crate::error::Result;
use crate::marker::{split_marker, MarkerKind, Split};
use crate::merge::merge_nodes;
use crate::node::Node;
use crate::visit::fold_post_order;
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Accumulated assemblies by name, in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct AssemblyTable(IndexMap<String, Node>);

impl AssemblyTable {
    /// Merge `payload` into the entry `name` and return a copy of the merged value
    pub fn record(&mut self, name: &str, payload: Node) -> Result<Node> {
        match self.0.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                tracing::debug!(name, "merging into existing assembly");
                let merged = merge_nodes(entry.get().clone(), payload)?;
                entry.insert(merged.clone());
                Ok(merged)
            }
            Entry::Vacant(entry) => {
                tracing::debug!(name, "new assembly");
                entry.insert(payload.clone());
                Ok(payload)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Record every assembly of `node` into `table`
///
/// Returns the document with each assembly marker replaced by the value accumulated so far
/// under its name. Fails on malformed markers and on merge conflicts, `table` keeps whatever
/// was recorded before the failure.
pub fn collect(node: Node, table: &mut AssemblyTable, local_tags: bool) -> Result<Node> {
    fold_post_order(node, &mut |node: Node| -> Result<Node> {
        match split_marker(node, MarkerKind::Assembly, local_tags)? {
            Split::Data(node) => Ok(node),
            Split::Marker(point) => table.record(&point.name, point.payload),
        }
    })
}
