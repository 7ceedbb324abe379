//! Node type and MIVOT vocabulary.

use indexmap::IndexMap;
use smol_str::SmolStr;

/// MIVOT element names used by the tree and the resolver.
pub mod tags {
    /// Mapping block holding definitions visible from anywhere.
    pub const GLOBALS: &str = "GLOBALS";
    /// Mapping block holding definitions scoped to one data table.
    pub const TEMPLATES: &str = "TEMPLATES";
    /// A data model object.
    pub const INSTANCE: &str = "INSTANCE";
    /// An ordered group of members without roles.
    pub const COLLECTION: &str = "COLLECTION";
    /// A leaf value.
    pub const ATTRIBUTE: &str = "ATTRIBUTE";
    /// A placeholder pointing at a definition by `dmref`.
    ///
    /// Earlier pipeline stages may disambiguate repeated reference sites by
    /// appending numeric suffixes (`REFERENCE_1`, `REFERENCE_2`, ...); tag
    /// matching is therefore prefix-based, see [`Node::is_reference`].
    pub const REFERENCE: &str = "REFERENCE";
}

/// MIVOT attribute names used by the tree and the resolver.
pub mod attrs {
    /// Identifier making a node a resolvable definition.
    pub const DMID: &str = "dmid";
    /// Identifier of the definition a REFERENCE points at.
    pub const DMREF: &str = "dmref";
    /// Structural role a node plays in its parent object.
    pub const DMROLE: &str = "dmrole";
    /// Data model type of an INSTANCE or ATTRIBUTE.
    pub const DMTYPE: &str = "dmtype";
    /// Identifier of the data table a TEMPLATES block annotates.
    pub const TABLEREF: &str = "tableref";
    /// Literal value of an ATTRIBUTE.
    pub const VALUE: &str = "value";
}

// ============================================================================
// NODE ID
// ============================================================================

/// Handle addressing a node slot inside an [`AnnotationTree`] arena.
///
/// Ids stay valid for the lifetime of the tree: splicing detaches nodes but
/// never frees their slots.
///
/// [`AnnotationTree`]: super::AnnotationTree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the node's slot in the arena.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// NODE
// ============================================================================

/// A single element of an annotation instance tree.
///
/// Stores the element name, its attributes in document order, and the
/// structural links managed by the owning [`AnnotationTree`].
///
/// [`AnnotationTree`]: super::AnnotationTree
#[derive(Clone, Debug)]
pub struct Node {
    tag: SmolStr,
    attrs: IndexMap<SmolStr, SmolStr>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    /// Create a node with the given element name and no attributes.
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            attrs: IndexMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set an attribute (builder form).
    pub fn with_attr(mut self, name: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// The element name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether this node belongs to the REFERENCE tag family.
    ///
    /// Matches any tag sharing the reserved prefix, so numbered variants
    /// produced by earlier pipeline stages are recognized too.
    pub fn is_reference(&self) -> bool {
        self.tag.starts_with(tags::REFERENCE)
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(SmolStr::as_str)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: impl Into<SmolStr>, value: impl Into<SmolStr>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Iterate over attributes in document order.
    pub fn attr_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `dmid` attribute, if this node is a resolvable definition.
    pub fn dmid(&self) -> Option<&str> {
        self.attr(attrs::DMID)
    }

    /// The `dmref` attribute, if this node points at a definition.
    pub fn dmref(&self) -> Option<&str> {
        self.attr(attrs::DMREF)
    }

    /// The `dmrole` attribute, if this node plays a role in its parent.
    pub fn dmrole(&self) -> Option<&str> {
        self.attr(attrs::DMROLE)
    }

    /// The `dmtype` attribute.
    pub fn dmtype(&self) -> Option<&str> {
        self.attr(attrs::DMTYPE)
    }

    /// The `tableref` attribute of a TEMPLATES block.
    pub fn tableref(&self) -> Option<&str> {
        self.attr(attrs::TABLEREF)
    }

    /// The parent node, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child node ids in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = Node::new(tags::INSTANCE)
            .with_attr(attrs::DMID, "P1")
            .with_attr(attrs::DMTYPE, "meas:Point");

        assert_eq!(node.tag(), "INSTANCE");
        assert_eq!(node.dmid(), Some("P1"));
        assert_eq!(node.dmtype(), Some("meas:Point"));
        assert_eq!(node.dmrole(), None);
    }

    #[test]
    fn test_attr_order_preserved() {
        let node = Node::new(tags::ATTRIBUTE)
            .with_attr(attrs::DMROLE, "coord:latitude")
            .with_attr(attrs::DMTYPE, "ivoa:RealQuantity")
            .with_attr(attrs::VALUE, "52.2");

        let names: Vec<_> = node.attr_pairs().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["dmrole", "dmtype", "value"]);
    }

    #[test]
    fn test_reference_prefix_matching() {
        assert!(Node::new("REFERENCE").is_reference());
        assert!(Node::new("REFERENCE_1").is_reference());
        assert!(Node::new("REFERENCE_17").is_reference());
        assert!(!Node::new("INSTANCE").is_reference());
        assert!(!Node::new("PREFERENCE").is_reference());
    }

    #[test]
    fn test_set_attr_overwrites() {
        let mut node = Node::new(tags::REFERENCE).with_attr(attrs::DMREF, "old");
        node.set_attr(attrs::DMREF, "new");
        assert_eq!(node.dmref(), Some("new"));
    }
}
