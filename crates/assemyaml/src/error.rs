//! errors raised while composing, assembling and transcluding documents
//!
//! Every error carries the position(s) of the offending node(s), see [Error::marks].
use crate::marker::MarkerKind;
use crate::node::Mark;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The stream is not valid YAML (or uses a core tag on the wrong kind of node)
    #[error("{message} at {mark}")]
    Syntax { message: String, mark: Mark },

    #[error("{kind} {problem} at {mark}")]
    MarkerShape {
        kind: MarkerKind,
        problem: MarkerProblem,
        mark: Mark,
    },

    #[error("Cannot merge {found} value at {found_mark} into {existing} value at {existing_mark}")]
    MergeIncompatible {
        found: String,
        found_mark: Mark,
        existing: String,
        existing_mark: Mark,
    },

    #[error("Cannot merge duplicate mapping key '{key}' at {key_mark} into existing mapping at {existing_mark}")]
    DuplicateKey {
        key: String,
        key_mark: Mark,
        existing_mark: Mark,
    },

    #[error("Transclude {name} at {mark} is nested inside its own expansion")]
    RecursiveTransclusion { name: String, mark: Mark },

    /// A node whose content does not have the shape its tag demands
    #[error("Unable to handle {tag} value at {mark}: {reason}")]
    Internal {
        tag: String,
        reason: String,
        mark: Mark,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerProblem {
    /// The marker key shares its mapping with other entries
    NotSingleEntry,
    /// The marker name is a sequence or a mapping
    NameNotScalar,
}

impl std::fmt::Display for MarkerProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerProblem::NotSingleEntry => f.write_str("must be a single-entry mapping"),
            MarkerProblem::NameNotScalar => f.write_str("name must be a scalar"),
        }
    }
}

impl Error {
    /// Source positions this error points to (one or two)
    pub fn marks(&self) -> Vec<&Mark> {
        match self {
            Error::Syntax { mark, .. }
            | Error::MarkerShape { mark, .. }
            | Error::RecursiveTransclusion { mark, .. }
            | Error::Internal { mark, .. } => vec![mark],
            Error::MergeIncompatible {
                found_mark,
                existing_mark,
                ..
            } => vec![found_mark, existing_mark],
            Error::DuplicateKey {
                key_mark,
                existing_mark,
                ..
            } => vec![key_mark, existing_mark],
        }
    }
}
