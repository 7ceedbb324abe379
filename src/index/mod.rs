//! Definition index over an annotation tree.
//!
//! Reference resolution needs to answer two questions: "which node defines
//! `dmid` X in the global namespace?" and "which node defines X in the
//! namespace of table T?". This module pre-computes both answers in one scan
//! of the tree, so lookups during resolution are O(1) and the tree itself
//! never has to be searched again:
//!
//! 1. Every `dmid` carrier inside the `GLOBALS` block registers globally.
//! 2. Every `dmid` carrier inside a `TEMPLATES` block registers under that
//!    block's `tableref`.
//!
//! The index is built once, before resolution begins, and is read-only
//! afterwards. Its entries are [`NodeId`]s into the scanned tree, so it is
//! only meaningful for that tree; successive resolution passes over
//! different subtrees of the document may all share it.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::error::{MivotError, Result};
use crate::tree::{AnnotationTree, NodeId, tags};

/// Lookup service consumed by the resolver.
///
/// Implementations answer identifier queries against the two MIVOT
/// namespaces. The resolver tries them in precedence order: global first,
/// then the table scope of the instance being resolved.
pub trait DefinitionIndex {
    /// Find the definition of `dmid` in the global namespace.
    fn lookup_global(&self, dmid: &str) -> Option<NodeId>;

    /// Find the definition of `dmid` in the namespace of table `tableref`.
    fn lookup_scoped(&self, tableref: &str, dmid: &str) -> Option<NodeId>;
}

/// Definition index built by scanning a tree's GLOBALS and TEMPLATES blocks.
#[derive(Debug, Default)]
pub struct AnnotationIndex {
    globals: FxHashMap<SmolStr, NodeId>,
    templates: FxHashMap<SmolStr, FxHashMap<SmolStr, NodeId>>,
}

impl AnnotationIndex {
    /// Scan `tree` and register every definition it declares.
    ///
    /// Fails with [`MivotError::DuplicateIdentifier`] if two definitions
    /// declare the same `dmid` within one scope. A TEMPLATES block without a
    /// `tableref` declares no namespace and is skipped.
    pub fn build(tree: &AnnotationTree) -> Result<Self> {
        let mut index = Self::default();
        let root = tree.root();
        for block in std::iter::once(root).chain(tree.descendants(root)) {
            match tree.node(block).tag() {
                tags::GLOBALS => {
                    for id in tree.descendants(block) {
                        if let Some(dmid) = tree.node(id).dmid() {
                            index.add_global(dmid, id)?;
                        }
                    }
                }
                tags::TEMPLATES => {
                    let Some(tableref) = tree.node(block).tableref().map(SmolStr::from) else {
                        debug!("skipping TEMPLATES block without tableref");
                        continue;
                    };
                    for id in tree.descendants(block) {
                        if let Some(dmid) = tree.node(id).dmid() {
                            index.add_scoped(tableref.clone(), dmid, id)?;
                        }
                    }
                }
                _ => {}
            }
        }
        debug!(
            globals = index.globals.len(),
            tables = index.templates.len(),
            "definition index built"
        );
        Ok(index)
    }

    /// Register a definition in the global namespace.
    pub fn add_global(&mut self, dmid: impl Into<SmolStr>, node: NodeId) -> Result<()> {
        let dmid = dmid.into();
        trace!(%dmid, "register global definition");
        if self.globals.insert(dmid.clone(), node).is_some() {
            return Err(MivotError::duplicate_global(dmid.as_str()));
        }
        Ok(())
    }

    /// Register a definition in a table-scoped namespace.
    pub fn add_scoped(
        &mut self,
        tableref: impl Into<SmolStr>,
        dmid: impl Into<SmolStr>,
        node: NodeId,
    ) -> Result<()> {
        let tableref = tableref.into();
        let dmid = dmid.into();
        trace!(%tableref, %dmid, "register table-scoped definition");
        let scope = self.templates.entry(tableref.clone()).or_default();
        if scope.insert(dmid.clone(), node).is_some() {
            return Err(MivotError::duplicate_scoped(&tableref, dmid.as_str()));
        }
        Ok(())
    }

    /// Number of global definitions.
    pub fn global_count(&self) -> usize {
        self.globals.len()
    }

    /// Number of definitions in the namespace of `tableref`.
    pub fn scoped_count(&self, tableref: &str) -> usize {
        self.templates.get(tableref).map_or(0, FxHashMap::len)
    }
}

impl DefinitionIndex for AnnotationIndex {
    fn lookup_global(&self, dmid: &str) -> Option<NodeId> {
        self.globals.get(dmid).copied()
    }

    fn lookup_scoped(&self, tableref: &str, dmid: &str) -> Option<NodeId> {
        self.templates.get(tableref)?.get(dmid).copied()
    }
}
