//! Static reference resolution.
//!
//! A `REFERENCE` node is a placeholder: "substitute the definition
//! identified by my `dmref` here". Resolution rewrites a subtree in place
//! until no placeholder remains:
//!
//! 1. **Collect** - all descendant REFERENCE nodes are materialized up
//!    front; splicing during live traversal is hazardous.
//! 2. **Look up** - each `dmref` is tried against the namespaces in
//!    precedence order: global first, then the table scope of the instance
//!    being resolved.
//! 3. **Expand** - the target definition is itself resolved, in place,
//!    before it is copied. A definition shared by many references is thus
//!    expanded once; every later reference copies the already-expanded
//!    subtree.
//! 4. **Splice** - a deep copy of the expanded definition replaces the
//!    reference at the same position among its siblings, carrying over the
//!    reference's `dmrole` when it has one.
//!
//! A definition found in the global namespace is expanded with no table
//! context (its own references may only use the global namespace); one
//! found in a table scope is expanded with that same table context.
//!
//! Resolution fails fast: an unresolvable or dynamic reference aborts the
//! whole call and leaves the tree mutated up to the failing point. Callers
//! needing atomicity should resolve a disposable copy of the tree.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::error::{MivotError, Result};
use crate::index::DefinitionIndex;
use crate::tree::{AnnotationTree, NodeId, attrs};

/// Static reference resolver over a pre-built definition index.
///
/// The index is borrowed read-only for the resolver's lifetime; all
/// structural mutation happens on the tree passed to [`Resolver::resolve`].
pub struct Resolver<'a, I: DefinitionIndex> {
    index: &'a I,
}

impl<'a, I: DefinitionIndex> Resolver<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    /// Resolve every REFERENCE node in the subtree below `node`.
    ///
    /// `node` itself is never replaced, only its descendants. `table_context`
    /// names the table whose scoped namespace may be searched when a global
    /// lookup misses; `None` restricts resolution to the global namespace.
    ///
    /// Returns the number of references resolved, including those expanded
    /// transitively inside nested definitions. The count is diagnostic; it
    /// does not influence resolution.
    pub fn resolve(
        &self,
        tree: &mut AnnotationTree,
        table_context: Option<&str>,
        node: NodeId,
    ) -> Result<usize> {
        let mut in_progress = FxHashSet::default();
        let resolved = self.resolve_inner(tree, table_context, node, &mut in_progress)?;
        debug!(resolved, "reference resolution finished");
        Ok(resolved)
    }

    fn resolve_inner(
        &self,
        tree: &mut AnnotationTree,
        table_context: Option<&str>,
        node: NodeId,
        in_progress: &mut FxHashSet<SmolStr>,
    ) -> Result<usize> {
        // Materialize the worklist before any splice.
        let references: Vec<NodeId> = tree
            .descendants(node)
            .filter(|&id| tree.node(id).is_reference())
            .collect();

        let mut resolved = 0;
        for reference in references {
            // A definition living inside this subtree may already have been
            // expanded by a nested step, detaching references collected
            // above. Their substitutions were counted by that step.
            if tree.parent(reference).is_none() {
                continue;
            }

            // No dmref means the reference is keyed off table data.
            let Some(dmref) = tree.node(reference).dmref().map(SmolStr::from) else {
                return Err(MivotError::UnsupportedReference);
            };

            // Namespaces in precedence order: global, then table scope. The
            // winning scope decides the context the target is expanded with.
            let (target, target_context) = match self.index.lookup_global(&dmref) {
                Some(target) => (target, None),
                None => match table_context.and_then(|t| {
                    self.index.lookup_scoped(t, &dmref).map(|target| (target, t))
                }) {
                    Some((target, table)) => (target, Some(table)),
                    None => return Err(MivotError::unresolved(dmref.as_str())),
                },
            };

            // Expand the definition itself before copying it. The guard set
            // holds every dmref on the current expansion chain; re-entering
            // one means the definitions reference each other.
            if !in_progress.insert(dmref.clone()) {
                return Err(MivotError::circular(dmref.as_str()));
            }
            resolved += self.resolve_inner(tree, target_context, target, in_progress)?;
            in_progress.remove(&dmref);

            let copy = tree.deep_copy(target);
            // A reference inside a collection carries no dmrole and
            // transfers none.
            let role = tree.node(reference).dmrole().map(SmolStr::from);
            if let Some(role) = role {
                tree.node_mut(copy).set_attr(attrs::DMROLE, role);
            }
            tree.splice(reference, copy);
            resolved += 1;
            trace!(
                %dmref,
                scope = target_context.unwrap_or("GLOBALS"),
                "substituted reference"
            );
        }
        Ok(resolved)
    }
}
