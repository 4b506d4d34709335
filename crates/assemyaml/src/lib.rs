//! # assemyaml - assemble yaml documents
//!
//! For CLI usage see the README.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `assemyaml` works internally.
//!
//! ### Terms
//!
//! - a **resource** document contributes named values, it is never written out
//! - a **template** document is written out after its markers have been resolved
//! - an **assembly** is a named value, declared with an assembly marker. Every declaration of
//!   the same name (across all resource documents) is merged into one value
//! - a **transclude** marker is replaced by the assembly of its name, merged with whatever the
//!   marker itself holds
//!
//! A marker is a single-entry mapping with a tagged key. The key is the name, the value the
//! payload:
//!
//! ```yaml
//! # resource
//! !Assembly World:
//!   - Second Line
//! ---
//! !Assembly World:
//!   - Third Line
//! ```
//!
//! ```yaml
//! # template
//! Hello:
//!   !Transclude World:
//!     - First Line
//! ```
//!
//! ```yaml
//! # output
//! Hello:
//!   - First Line
//!   - Second Line
//!   - Third Line
//! ```
//!
//! The short `!Assembly`/`!Transclude` spellings are local tags and can be turned off
//! ([Options::local_tags]). The global tags `!<tag:assemyaml.nz,2017:Assembly>` and
//! `!<tag:assemyaml.nz,2017:Transclude>` always work.
//!
//! ### Loading
//!
//! Input text is composed into [node::Node] trees by [compose::compose], one tree per document.
//! Unlike a plain yaml loader this keeps everything the later steps need: the tag of every node
//! (explicit or resolved with the YAML 1.1 rules, see [scalar]), mappings as ordered key/value
//! lists with arbitrary keys, and the source position of every node.
//! [documents::Stream] pairs the documents of one input with its path.
//!
//! ### Collecting assemblies
//!
//! see [assemble::collect]
//!
//! Each resource document is walked bottom up. Every assembly marker is merged into the
//! [assemble::AssemblyTable] entry of its name and replaced by the merged value. Merging
//! ([merge::merge_nodes]) is type directed:
//!
//! - null merges with anything
//! - sequences concatenate
//! - mappings append, a key that exists on both sides is an error
//! - scalars never merge
//!
//! Duplicate keys are found with [equality::nodes_equal], which compares by value and ignores
//! the order of mappings and sets.
//!
//! ### Transcluding
//!
//! see [transclude::transclude]
//!
//! Each template document gets its own copy of the table, first extended with the template's
//! own assemblies, then used to resolve its transclude markers top down. The resolved value is
//! walked as well, so assemblies may transclude other assemblies. A name that shows up again
//! inside the part of its expansion that came from the assembly is an error. The marker's own
//! payload may use the name again.
//!
//! [assembler::Assembler] runs both passes over a whole set of inputs.
//!
//! ### Output
//!
//! Rendered documents are written as yaml or json, see [emit]. The yaml writer keeps tags and
//! quotes strings that would read back as another type.
//!
pub mod assemble;
pub mod assembler;
pub mod compose;
pub mod documents;
pub mod emit;
pub mod equality;
pub mod error;
pub mod marker;
pub mod merge;
pub mod node;
pub mod scalar;
pub mod transclude;
mod visit;

pub use assembler::{Assembler, Options};
pub use error::{Error, Result};
