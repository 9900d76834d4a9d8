use serde::{Deserialize, Serialize};

use super::AstNode;
use crate::path::NodePath;

/// An ordered list of root nodes.
///
/// Several roots are legal: targets without nested types describe each logical
/// nested type as its own root. Constructing a hierarchy places every node at its
/// path, so [`AstNode::path`] is always accurate for nodes reached through one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<AstNode>", into = "Vec<AstNode>")]
pub struct AstNodeHierarchy {
    roots: Vec<AstNode>,
}

impl AstNodeHierarchy {
    pub fn new(roots: Vec<AstNode>) -> Self {
        let mut roots = roots;
        for root in roots.iter_mut() {
            let path = NodePath::root(root.name.clone());
            root.reroot(path);
        }
        Self { roots }
    }

    /// The canonical hierarchy with zero roots
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots(&self) -> &[AstNode] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<AstNode> {
        self.roots
    }

    pub fn root(&self, name: &str) -> Option<&AstNode> {
        self.roots.iter().find(|root| root.name == name)
    }

    /// Append a root, replacing an existing root with the same name in place
    pub fn with_root(mut self, root: AstNode) -> Self {
        let mut root = root;
        root.reroot(NodePath::root(root.name.clone()));
        match self.roots.iter_mut().find(|existing| existing.name == root.name) {
            Some(existing) => *existing = root,
            None => self.roots.push(root),
        }
        self
    }

    pub fn without_root(mut self, name: &str) -> Self {
        self.roots.retain(|root| root.name != name);
        self
    }

    /// Resolve a path; absence is reported as `None`
    pub fn find(&self, path: &NodePath) -> Option<&AstNode> {
        let mut segments = path.iter();
        let mut node = self.root(segments.next()?)?;
        for segment in segments {
            node = node.child(segment)?;
        }
        Some(node)
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.find(path).is_some()
    }

    /// The node holding `node` as a child, `None` for roots or foreign nodes
    pub fn parent_of(&self, node: &AstNode) -> Option<&AstNode> {
        self.find(&node.parent_path()?)
    }

    /// Nodes from the root down to (and including) the node at `path`
    pub fn ancestry(&self, path: &NodePath) -> Option<Vec<&AstNode>> {
        let mut segments = path.iter();
        let mut node = self.root(segments.next()?)?;
        let mut chain = vec![node];
        for segment in segments {
            node = node.child(segment)?;
            chain.push(node);
        }
        Some(chain)
    }

    /// Depth-first, pre-order walk over every node of every root
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: self.roots.iter().rev().collect(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }
}

impl From<Vec<AstNode>> for AstNodeHierarchy {
    fn from(roots: Vec<AstNode>) -> Self {
        Self::new(roots)
    }
}

impl From<AstNodeHierarchy> for Vec<AstNode> {
    fn from(hierarchy: AstNodeHierarchy) -> Self {
        hierarchy.roots
    }
}

/// Pre-order iterator returned by [`AstNodeHierarchy::iter`]
pub struct Iter<'a> {
    stack: Vec<&'a AstNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a AstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.values().rev());
        Some(node)
    }
}

impl<'a> IntoIterator for &'a AstNodeHierarchy {
    type Item = &'a AstNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
