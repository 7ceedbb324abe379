//! Shared fixtures for integration tests.

use mivot::{AnnotationTree, Node, NodeId, attrs, tags};

/// Builder for mapping documents: a VODML root with one GLOBALS block and
/// any number of TEMPLATES blocks.
pub struct MappingFixture {
    pub tree: AnnotationTree,
    pub globals: NodeId,
}

impl MappingFixture {
    pub fn new() -> Self {
        let mut tree = AnnotationTree::new(Node::new("VODML"));
        let globals = tree.add_child(tree.root(), Node::new(tags::GLOBALS));
        Self { tree, globals }
    }

    /// Add a TEMPLATES block annotating the given table.
    pub fn templates(&mut self, tableref: &str) -> NodeId {
        let root = self.tree.root();
        self.tree.add_child(
            root,
            Node::new(tags::TEMPLATES).with_attr(attrs::TABLEREF, tableref),
        )
    }

    /// Add an INSTANCE node, optionally resolvable via `dmid`.
    pub fn instance(&mut self, parent: NodeId, dmid: Option<&str>, dmtype: &str) -> NodeId {
        let mut node = Node::new(tags::INSTANCE).with_attr(attrs::DMTYPE, dmtype);
        if let Some(dmid) = dmid {
            node = node.with_attr(attrs::DMID, dmid);
        }
        self.tree.add_child(parent, node)
    }

    /// Add a leaf ATTRIBUTE with a role and a value.
    pub fn attribute(&mut self, parent: NodeId, dmrole: &str, value: &str) -> NodeId {
        self.tree.add_child(
            parent,
            Node::new(tags::ATTRIBUTE)
                .with_attr(attrs::DMROLE, dmrole)
                .with_attr(attrs::VALUE, value),
        )
    }

    /// Add a REFERENCE node, optionally carrying a role.
    pub fn reference(&mut self, parent: NodeId, dmref: &str, dmrole: Option<&str>) -> NodeId {
        self.reference_tagged(parent, tags::REFERENCE, dmref, dmrole)
    }

    /// Add a reference node with an explicit (possibly suffixed) tag.
    pub fn reference_tagged(
        &mut self,
        parent: NodeId,
        tag: &str,
        dmref: &str,
        dmrole: Option<&str>,
    ) -> NodeId {
        let mut node = Node::new(tag).with_attr(attrs::DMREF, dmref);
        if let Some(dmrole) = dmrole {
            node = node.with_attr(attrs::DMROLE, dmrole);
        }
        self.tree.add_child(parent, node)
    }
}

/// Count the REFERENCE-family nodes below `node`.
pub fn count_references(tree: &AnnotationTree, node: NodeId) -> usize {
    tree.descendants(node)
        .filter(|&id| tree.node(id).is_reference())
        .count()
}
