//! assembly and transclude markers
//!
//! A marker is a single-entry mapping whose key carries a marker tag:
//!
//! ```yaml
//! Hello:
//!   !Transclude World:   # marker name: World
//!     - First Line       # marker payload
//! ```
//!
//! Each kind has two spellings. The global tag (`!<tag:assemyaml.nz,2017:Assembly>`) is always
//! recognized, the local tag (`!Assembly`) only when local tags are enabled.
//!
//! Entries of `!!omap` and `!!pairs` are never markers, even when their key carries a marker
//! tag. Their replacement would have to be a single key/value pair again, so they stay data.
use crate::error::{Error, MarkerProblem, Result};
use crate::node::{Content, Mark, Node, Tag};

pub const GLOBAL_ASSEMBLY_TAG: &str = "tag:assemyaml.nz,2017:Assembly";
pub const LOCAL_ASSEMBLY_TAG: &str = "!Assembly";
pub const GLOBAL_TRANSCLUDE_TAG: &str = "tag:assemyaml.nz,2017:Transclude";
pub const LOCAL_TRANSCLUDE_TAG: &str = "!Transclude";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Assembly,
    Transclude,
}

impl MarkerKind {
    pub fn global_tag(&self) -> &'static str {
        match self {
            MarkerKind::Assembly => GLOBAL_ASSEMBLY_TAG,
            MarkerKind::Transclude => GLOBAL_TRANSCLUDE_TAG,
        }
    }

    pub fn local_tag(&self) -> &'static str {
        match self {
            MarkerKind::Assembly => LOCAL_ASSEMBLY_TAG,
            MarkerKind::Transclude => LOCAL_TRANSCLUDE_TAG,
        }
    }

    /// Does `tag` spell this kind of marker?
    pub fn matches(&self, tag: &Tag, local_tags: bool) -> bool {
        let Tag::Custom(tag) = tag else {
            return false;
        };

        tag == self.global_tag() || (local_tags && tag == self.local_tag())
    }
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerKind::Assembly => f.write_str("Assembly"),
            MarkerKind::Transclude => f.write_str("Transclude"),
        }
    }
}

/// A recognized marker, taken apart
#[derive(derive_new::new, Debug)]
pub struct MarkerPoint {
    pub kind: MarkerKind,
    pub name: String,
    pub payload: Node,
    /// Where the marker mapping starts
    pub start: Mark,
}

/// Outcome of [split_marker]
#[derive(Debug)]
pub enum Split {
    Marker(MarkerPoint),
    /// Not a marker, handed back untouched
    Data(Node),
}

/// Find the name of the marker `node` represents, if any
///
/// Fails when a marker key shares its mapping with other entries or when its name is a collection.
pub fn marker_name<'n>(
    node: &'n Node,
    kind: MarkerKind,
    local_tags: bool,
) -> Result<Option<&'n str>> {
    // ordered maps and pairs are written as sequences and never form a marker
    if matches!(node.tag, Tag::Omap | Tag::Pairs) {
        return Ok(None);
    }

    let Content::Pairs(pairs) = &node.content else {
        return Ok(None);
    };

    let Some((key, _)) = pairs.iter().find(|(key, _)| kind.matches(&key.tag, local_tags)) else {
        return Ok(None);
    };

    if pairs.len() != 1 {
        return Err(Error::MarkerShape {
            kind,
            problem: MarkerProblem::NotSingleEntry,
            mark: node.start.clone(),
        });
    }

    match &key.content {
        Content::Scalar(name) => Ok(Some(name.as_str())),
        _ => Err(Error::MarkerShape {
            kind,
            problem: MarkerProblem::NameNotScalar,
            mark: key.start.clone(),
        }),
    }
}

/// Take `node` apart if it is a marker of `kind`
pub fn split_marker(node: Node, kind: MarkerKind, local_tags: bool) -> Result<Split> {
    let Some(name) = marker_name(&node, kind, local_tags)?.map(str::to_string) else {
        return Ok(Split::Data(node));
    };

    let Node { content, start, .. } = node;
    let payload = match content {
        Content::Pairs(pairs) => pairs.into_iter().next().map(|(_, payload)| payload),
        _ => None,
    };
    let payload = payload.unwrap_or_else(|| Node::null(start.clone()));

    Ok(Split::Marker(MarkerPoint::new(kind, name, payload, start)))
}
