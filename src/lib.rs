//! # mivot-base
//!
//! Core library for MIVOT annotation trees: instance tree model, definition
//! index, and static reference resolution.
//!
//! A MIVOT mapping block annotates astronomical data tables with data model
//! objects. Objects defined once (in `GLOBALS`, or in a `TEMPLATES` block
//! scoped to one table) are pointed at from elsewhere through `REFERENCE`
//! placeholders. This crate expands those placeholders: after resolution the
//! tree contains only concrete objects, each substituted as an independent
//! deep copy carrying the structural role of the reference it replaced.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! resolve   → static reference resolution (in-place tree rewrite)
//!   ↓
//! index     → definition index (GLOBALS / TEMPLATES namespaces)
//!   ↓
//! tree      → arena-based annotation instance tree
//!   ↓
//! error     → crate-wide error type
//! ```
//!
//! ## Usage
//!
//! ```
//! use mivot::{AnnotationIndex, AnnotationTree, Node, Resolver, attrs, tags};
//!
//! let mut tree = AnnotationTree::new(Node::new("VODML"));
//! let globals = tree.add_child(tree.root(), Node::new(tags::GLOBALS));
//! let frame = Node::new(tags::INSTANCE)
//!     .with_attr(attrs::DMID, "icrs_frame")
//!     .with_attr(attrs::DMTYPE, "coords:SpaceFrame");
//! tree.add_child(globals, frame);
//!
//! let host = tree.add_child(tree.root(), Node::new(tags::INSTANCE));
//! let reference = Node::new(tags::REFERENCE)
//!     .with_attr(attrs::DMREF, "icrs_frame")
//!     .with_attr(attrs::DMROLE, "coordSys");
//! tree.add_child(host, reference);
//!
//! let index = AnnotationIndex::build(&tree)?;
//! let resolved = Resolver::new(&index).resolve(&mut tree, None, host)?;
//! assert_eq!(resolved, 1);
//! # Ok::<(), mivot::MivotError>(())
//! ```

/// Crate-wide error type.
pub mod error;

/// Arena-based annotation instance tree.
pub mod tree;

/// Definition index: GLOBALS and TEMPLATES namespaces.
pub mod index;

/// Static reference resolution.
pub mod resolve;

// Re-export commonly needed items
pub use error::{MivotError, Result};
pub use index::{AnnotationIndex, DefinitionIndex};
pub use resolve::Resolver;
pub use tree::{AnnotationTree, Node, NodeId, attrs, tags};
