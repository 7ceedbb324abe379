//! Arena-based annotation instance tree.
//!
//! An [`AnnotationTree`] owns every node of one mapping document in a single
//! arena (`Vec<Node>` addressed by [`NodeId`]), the same single-source-of-truth
//! layout the rest of the crate builds on:
//!
//! ```text
//! AnnotationTree
//! ├── arena: Vec<Node>      (slots are never freed)
//! └── root: NodeId
//! ```
//!
//! Structural mutation goes through the tree so parent/child links stay
//! consistent: [`AnnotationTree::add_child`], [`AnnotationTree::splice`],
//! [`AnnotationTree::deep_copy`]. Detached nodes keep their slots, so ids
//! held elsewhere (for example by a definition index) survive splices.

mod node;

pub use node::{Node, NodeId, attrs, tags};

/// A mutable, ordered annotation document tree.
#[derive(Clone, Debug)]
pub struct AnnotationTree {
    /// Arena storage for all nodes - single source of truth.
    arena: Vec<Node>,
    root: NodeId,
}

impl AnnotationTree {
    /// Create a tree from its root node.
    pub fn new(root: Node) -> Self {
        let mut tree = Self {
            arena: Vec::new(),
            root: NodeId::new(0),
        };
        tree.root = tree.alloc(root);
        tree
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.arena.len());
        self.arena.push(node);
        id
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id.index()]
    }

    /// Borrow a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.arena[id.index()]
    }

    /// Number of slots in the arena, detached nodes included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the arena is empty. Always false once constructed.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// The parent of a node, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Child ids of a node in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    // ========================================================================
    // STRUCTURAL MUTATION
    // ========================================================================

    /// Append a new node as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.alloc(node);
        self.node_mut(id).parent = Some(parent);
        self.node_mut(parent).children.push(id);
        id
    }

    /// Replace `old` with `new` at the same position among `old`'s siblings.
    ///
    /// `old` is detached (its parent link cleared) but keeps its arena slot;
    /// `new` must be detached before the call. Returns false without mutating
    /// anything if `old` has no parent.
    pub fn splice(&mut self, old: NodeId, new: NodeId) -> bool {
        debug_assert!(self.node(new).parent.is_none(), "splice target must be detached");
        let Some(parent) = self.node(old).parent else {
            return false;
        };
        let children = &mut self.node_mut(parent).children;
        let Some(pos) = children.iter().position(|&c| c == old) else {
            return false;
        };
        children[pos] = new;
        self.node_mut(new).parent = Some(parent);
        self.node_mut(old).parent = None;
        true
    }

    /// Deep-copy the subtree rooted at `id` into fresh arena slots.
    ///
    /// The copy is a detached, independent value: mutating it never affects
    /// the original, and vice versa.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let mut copy = self.node(id).clone();
        copy.parent = None;
        copy.children = Vec::new();
        let copy_id = self.alloc(copy);
        let children = self.node(id).children.clone();
        for child in children {
            let child_copy = self.deep_copy(child);
            self.node_mut(child_copy).parent = Some(copy_id);
            self.node_mut(copy_id).children.push(child_copy);
        }
        copy_id
    }

    // ========================================================================
    // TRAVERSAL
    // ========================================================================

    /// Iterate over the descendants of `id` in document (preorder) order,
    /// excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.node(id).children.clone();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    // ========================================================================
    // DIAGNOSTICS
    // ========================================================================

    /// Render the subtree rooted at `id` as indented XML-like text.
    ///
    /// For tracing and test failure output only; this is not a serializer.
    pub fn render(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.render_into(id, 0, &mut out);
        out
    }

    fn render_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.node(id);
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push('<');
        out.push_str(node.tag());
        for (name, value) in node.attr_pairs() {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        if node.children().is_empty() {
            out.push_str("/>\n");
            return;
        }
        out.push_str(">\n");
        for &child in node.children() {
            self.render_into(child, depth + 1, out);
        }
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str("</");
        out.push_str(node.tag());
        out.push_str(">\n");
    }
}

/// Preorder iterator over a subtree, excluding its root.
pub struct Descendants<'a> {
    tree: &'a AnnotationTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        for &child in self.tree.node(id).children().iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_tree() -> (AnnotationTree, NodeId, NodeId) {
        let mut tree = AnnotationTree::new(Node::new(tags::INSTANCE).with_attr(attrs::DMTYPE, "meas:Point"));
        let root = tree.root();
        let x = tree.add_child(
            root,
            Node::new(tags::ATTRIBUTE)
                .with_attr(attrs::DMROLE, "x")
                .with_attr(attrs::VALUE, "1"),
        );
        let y = tree.add_child(
            root,
            Node::new(tags::ATTRIBUTE)
                .with_attr(attrs::DMROLE, "y")
                .with_attr(attrs::VALUE, "2"),
        );
        (tree, x, y)
    }

    #[test]
    fn test_add_child_links() {
        let (tree, x, y) = point_tree();
        let root = tree.root();
        assert_eq!(tree.children(root), &[x, y]);
        assert_eq!(tree.parent(x), Some(root));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = AnnotationTree::new(Node::new("a"));
        let b = tree.add_child(tree.root(), Node::new("b"));
        let c = tree.add_child(b, Node::new("c"));
        let d = tree.add_child(tree.root(), Node::new("d"));

        let order: Vec<_> = tree.descendants(tree.root()).collect();
        assert_eq!(order, vec![b, c, d]);

        // The subtree root itself is not enumerated.
        assert_eq!(tree.descendants(b).collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let (mut tree, x, _) = point_tree();
        let copy = tree.deep_copy(tree.root());

        assert_eq!(tree.parent(copy), None);
        assert_eq!(tree.children(copy).len(), 2);

        let x_copy = tree.children(copy)[0];
        tree.node_mut(x_copy).set_attr(attrs::VALUE, "99");
        assert_eq!(tree.node(x).attr(attrs::VALUE), Some("1"));
    }

    #[test]
    fn test_splice_keeps_position() {
        let (mut tree, x, y) = point_tree();
        let root = tree.root();
        let replacement = tree.deep_copy(y);

        assert!(tree.splice(x, replacement));
        assert_eq!(tree.children(root), &[replacement, y]);
        assert_eq!(tree.parent(x), None);
        assert_eq!(tree.parent(replacement), Some(root));
    }

    #[test]
    fn test_splice_detached_is_noop() {
        let (mut tree, _, y) = point_tree();
        let detached = tree.deep_copy(y);
        let other = tree.deep_copy(y);
        assert!(!tree.splice(detached, other));
    }

    #[test]
    fn test_render() {
        let (tree, _, _) = point_tree();
        let text = tree.render(tree.root());
        assert!(text.starts_with("<INSTANCE dmtype=\"meas:Point\">"));
        assert!(text.contains("<ATTRIBUTE dmrole=\"x\" value=\"1\"/>"));
    }
}
