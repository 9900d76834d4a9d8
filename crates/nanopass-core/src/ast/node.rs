use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{AstNodeMember, AttributeSet, AttributeValue};
use crate::path::NodePath;

/// An immutable node of an [`AstNodeHierarchy`](super::AstNodeHierarchy).
///
/// The parent relation is not stored as a reference. Every node records the
/// [`NodePath`] it was placed at; the parent is that path minus its leaf and is
/// resolved against a hierarchy with
/// [`AstNodeHierarchy::parent_of`](super::AstNodeHierarchy::parent_of).
/// The path is excluded from equality and hashing, so two nodes with the same
/// content built under different parents compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "AstNodeRepr")]
pub struct AstNode {
    pub name: String,
    pub documentation: Option<String>,
    /// Children keyed by child name. Insert through [`AstNode::with_child`] to keep
    /// the key and the child's placement in sync.
    pub children: IndexMap<String, AstNode>,
    /// Members keyed by member name
    pub members: IndexMap<String, AstNodeMember>,
    pub attributes: AttributeSet,
    #[serde(skip_serializing)]
    path: NodePath,
}

impl AstNode {
    /// A detached node; its path is the single segment `name` until it is placed
    /// under a parent or into a hierarchy.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: NodePath::root(name.clone()),
            name,
            documentation: None,
            children: IndexMap::new(),
            members: IndexMap::new(),
            attributes: AttributeSet::new(),
        }
    }

    /// A node already placed at `path`; used by the builders, which assign
    /// paths top-down while reconstructing a hierarchy.
    pub(crate) fn placed(name: impl Into<String>, path: NodePath) -> Self {
        let mut node = Self::new(name);
        node.path = path;
        node
    }

    /// Where this node sits in the hierarchy it was built into
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// Path of the parent node, `None` for roots
    pub fn parent_path(&self) -> Option<NodePath> {
        self.path.parent().ok()
    }

    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    pub fn child(&self, name: &str) -> Option<&AstNode> {
        self.children.get(name)
    }

    pub fn member(&self, name: &str) -> Option<&AstNodeMember> {
        self.members.get(name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// No children, no members and no attributes
    pub fn is_bare(&self) -> bool {
        self.children.is_empty() && self.members.is_empty() && self.attributes.is_empty()
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeValue) -> Self {
        self.attributes.insert(attribute);
        self
    }

    /// Insert or replace the member with the same name
    pub fn with_member(mut self, member: AstNodeMember) -> Self {
        self.members.insert(member.name.clone(), member);
        self
    }

    pub fn without_member(mut self, name: &str) -> Self {
        self.members.shift_remove(name);
        self
    }

    /// Insert or replace the child with the same name, placing it (and its
    /// subtree) under this node's path.
    pub fn with_child(mut self, mut child: AstNode) -> Self {
        child.reroot(self.path.child(child.name.clone()));
        self.children.insert(child.name.clone(), child);
        self
    }

    pub fn without_child(mut self, name: &str) -> Self {
        self.children.shift_remove(name);
        self
    }

    /// Re-assign this node's path and the paths of its whole subtree
    pub(crate) fn reroot(&mut self, path: NodePath) {
        for (name, child) in self.children.iter_mut() {
            child.reroot(path.child(name.clone()));
        }
        self.path = path;
    }
}

impl PartialEq for AstNode {
    fn eq(&self, other: &Self) -> bool {
        // IndexMap equality is key-wise and ignores insertion order
        self.name == other.name
            && self.documentation == other.documentation
            && self.attributes == other.attributes
            && self.members == other.members
            && self.children == other.children
    }
}

impl Eq for AstNode {}

impl Hash for AstNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.documentation.hash(state);
        self.attributes.hash(state);

        let mut members: Vec<_> = self.members.iter().collect();
        members.sort_by(|a, b| a.0.cmp(b.0));
        members.len().hash(state);
        for (name, member) in members {
            name.hash(state);
            member.hash(state);
        }

        let mut children: Vec<_> = self.children.iter().collect();
        children.sort_by(|a, b| a.0.cmp(b.0));
        children.len().hash(state);
        for (name, child) in children {
            name.hash(state);
            child.hash(state);
        }
    }
}

/// Serialized shape of a node; paths are rebuilt on the way in
#[derive(Deserialize)]
struct AstNodeRepr {
    name: String,
    #[serde(default)]
    documentation: Option<String>,
    #[serde(default)]
    children: IndexMap<String, AstNode>,
    #[serde(default)]
    members: IndexMap<String, AstNodeMember>,
    #[serde(default)]
    attributes: AttributeSet,
}

impl From<AstNodeRepr> for AstNode {
    fn from(repr: AstNodeRepr) -> Self {
        let mut node = AstNode {
            path: NodePath::root(repr.name.clone()),
            name: repr.name,
            documentation: repr.documentation,
            children: repr.children,
            members: repr.members,
            attributes: repr.attributes,
        };
        let path = node.path.clone();
        node.reroot(path);
        node
    }
}
