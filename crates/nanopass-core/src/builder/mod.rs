/*!
# Hierarchy Builders

Mutable staging area used to reconstruct immutable hierarchies.

A [`HierarchyBuilder`] keeps a registry of [`NodeBuilder`]s keyed by
[`NodePath`]. Mutations (adding or removing children and members, renaming nodes)
only touch the staging registry; nothing is checked until [`HierarchyBuilder::build`]
walks every root depth-first and materializes fresh [`AstNode`] values, placing
each child under its already-built parent's path.
*/

pub mod node_builder;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::ast::{AstNode, AstNodeHierarchy};
use crate::path::NodePath;

pub use node_builder::{MemberBuilder, NodeBuilder};

/// What `build` does when a node lists a child that has no registered builder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingChildBehavior {
    /// Fail the build with [`BuildError::MissingChild`]
    #[default]
    Throw,
    /// Substitute a childless, memberless, attributeless node
    CreateEmptyNode,
}

/// Errors detected while materializing staged nodes
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Node '{parent}' declares child '{child}' but no builder was registered for it")]
    MissingChild { parent: NodePath, child: String },

    #[error("Root '{root}' is declared but no builder was registered for it")]
    MissingRoot { root: String },

    #[error("Node '{path}' declares member '{member}' more than once")]
    DuplicateMember { path: NodePath, member: String },

    #[error("No node builder registered at '{path}'")]
    NodeNotFound { path: NodePath },

    #[error("Node '{path}' is staged more than once")]
    DuplicateNode { path: NodePath },
}

/// Staging registry for a whole hierarchy
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder {
    roots: Vec<String>,
    nodes: IndexMap<NodePath, NodeBuilder>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage every node of `hierarchy`; building the result yields an equal hierarchy
    pub fn from_hierarchy(hierarchy: &AstNodeHierarchy) -> Self {
        let mut builder = Self::new();
        for root in hierarchy.roots() {
            let path = NodePath::root(root.name.clone());
            if !builder.roots.contains(&root.name) {
                builder.roots.push(root.name.clone());
            }
            builder.register_subtree(path, root);
        }
        builder
    }

    fn register_subtree(&mut self, path: NodePath, node: &AstNode) {
        for (name, child) in &node.children {
            self.register_subtree(path.child(name.clone()), child);
        }
        self.nodes.insert(path, NodeBuilder::from_node(node));
    }

    /// Stage a node (and its subtree) at `path`, replacing whatever was staged
    /// there. The parent's child list is not touched.
    pub fn stage_node(&mut self, path: &NodePath, node: &AstNode) {
        self.prune(path);
        self.register_subtree(path.clone(), node);
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn node(&self, path: &NodePath) -> Option<&NodeBuilder> {
        self.nodes.get(path)
    }

    pub fn node_mut(&mut self, path: &NodePath) -> Option<&mut NodeBuilder> {
        self.nodes.get_mut(path)
    }

    /// Declare a root, creating an empty builder for it if none is registered
    pub fn add_root(&mut self, name: impl Into<String>) -> &mut NodeBuilder {
        let name = name.into();
        if !self.roots.contains(&name) {
            self.roots.push(name.clone());
        }
        self.nodes
            .entry(NodePath::root(name.clone()))
            .or_insert_with(|| NodeBuilder::new(name))
    }

    /// Declare `name` as a child of the node at `parent` and make sure a builder
    /// exists for it. Returns `None` when no builder is registered at `parent`.
    pub fn add_child(&mut self, parent: &NodePath, name: impl Into<String>) -> Option<&mut NodeBuilder> {
        let name = name.into();
        self.nodes.get_mut(parent)?.add_child_name(name.clone());
        let path = parent.child(name.clone());
        Some(self.nodes.entry(path).or_insert_with(|| NodeBuilder::new(name)))
    }

    /// Declare a child name without registering a builder for it.
    ///
    /// Whether the gap is an error is decided at build time by
    /// [`MissingChildBehavior`].
    pub fn declare_child(&mut self, parent: &NodePath, name: impl Into<String>) -> bool {
        match self.nodes.get_mut(parent) {
            Some(node) => node.add_child_name(name),
            None => false,
        }
    }

    /// Drop `name` from the parent's child list along with every staged entry
    /// under it. Returns false if nothing was declared or staged.
    pub fn remove_child(&mut self, parent: &NodePath, name: &str) -> bool {
        let declared = self
            .nodes
            .get_mut(parent)
            .map(|node| node.remove_child_name(name))
            .unwrap_or(false);
        let pruned = self.prune(&parent.child(name.to_string()));
        declared || pruned > 0
    }

    /// Remove the node at `path`, whether it is a root or a child
    pub fn remove_node(&mut self, path: &NodePath) -> bool {
        match path.parent() {
            Ok(parent) => self.remove_child(&parent, path.leaf()),
            Err(_) => {
                let before = self.roots.len();
                self.roots.retain(|root| root != path.leaf());
                let pruned = self.prune(path);
                before != self.roots.len() || pruned > 0
            }
        }
    }

    /// Rename the node at `path`, re-keying its staged descendants and updating
    /// the parent's child list (or the root list). A node already staged under
    /// the new name is replaced. Returns the new path, or `None` if nothing is
    /// registered at `path`.
    pub fn rename_node(&mut self, path: &NodePath, new_name: &str) -> Option<NodePath> {
        if !self.nodes.contains_key(path) {
            return None;
        }
        let new_path = path.with_leaf(new_name);
        if new_path == *path {
            return Some(new_path);
        }

        self.prune(&new_path);
        match path.parent() {
            Ok(parent) => {
                if let Some(parent_builder) = self.nodes.get_mut(&parent) {
                    parent_builder.remove_child_name(new_name);
                    parent_builder.rename_child(path.leaf(), new_name);
                }
            }
            Err(_) => {
                self.roots.retain(|root| root != new_name);
                if let Some(slot) = self.roots.iter_mut().find(|root| root.as_str() == path.leaf()) {
                    *slot = new_name.to_string();
                }
            }
        }

        let nodes = std::mem::take(&mut self.nodes);
        self.nodes = nodes
            .into_iter()
            .map(|(key, node)| match key.rebase(path, &new_path) {
                Some(rebased) => (rebased, node),
                None => (key, node),
            })
            .collect();
        if let Some(node) = self.nodes.get_mut(&new_path) {
            node.set_name(new_name);
        }

        trace!(from = %path, to = %new_path, "renamed staged node");
        Some(new_path)
    }

    /// Remove every entry at or below `path`; returns how many were dropped
    fn prune(&mut self, path: &NodePath) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|key, _| !key.starts_with(path));
        before - self.nodes.len()
    }

    /// Materialize every root. Staged entries no longer reachable from a root
    /// are discarded.
    pub fn build(&self, behavior: MissingChildBehavior) -> Result<AstNodeHierarchy, BuildError> {
        let mut roots = Vec::with_capacity(self.roots.len());
        for name in &self.roots {
            let path = NodePath::root(name.clone());
            let root = match self.nodes.get(&path) {
                Some(_) => self.build_subtree(&path, behavior)?,
                None => match behavior {
                    MissingChildBehavior::Throw => {
                        return Err(BuildError::MissingRoot { root: name.clone() })
                    }
                    MissingChildBehavior::CreateEmptyNode => AstNode::placed(name.clone(), path),
                },
            };
            roots.push(root);
        }
        trace!(roots = roots.len(), staged = self.nodes.len(), "built hierarchy");
        Ok(AstNodeHierarchy::new(roots))
    }

    /// Materialize the node at `path`.
    ///
    /// Parent relations are fixed at build time, so the whole tree under the
    /// node's root is reconstructed and the node is taken from it.
    pub fn build_node(&self, path: &NodePath, behavior: MissingChildBehavior) -> Result<AstNode, BuildError> {
        if !self.nodes.contains_key(path) {
            return Err(BuildError::NodeNotFound { path: path.clone() });
        }
        let root_path = NodePath::root(path.root_name());
        let root = self.build_subtree(&root_path, behavior)?;
        let hierarchy = AstNodeHierarchy::new(vec![root]);
        hierarchy
            .find(path)
            .cloned()
            .ok_or_else(|| BuildError::NodeNotFound { path: path.clone() })
    }

    fn build_subtree(&self, path: &NodePath, behavior: MissingChildBehavior) -> Result<AstNode, BuildError> {
        let builder = self
            .nodes
            .get(path)
            .ok_or_else(|| BuildError::NodeNotFound { path: path.clone() })?;

        let mut node = AstNode::placed(builder.name(), path.clone());
        node.documentation = builder.documentation.clone();
        node.attributes = builder.attributes.clone();

        for member in builder.members() {
            if node.members.contains_key(&member.name) {
                return Err(BuildError::DuplicateMember {
                    path: path.clone(),
                    member: member.name.clone(),
                });
            }
            node.members.insert(member.name.clone(), member.build());
        }

        for child_name in builder.children() {
            let child_path = path.child(child_name.clone());
            let child = if self.nodes.contains_key(&child_path) {
                self.build_subtree(&child_path, behavior)?
            } else {
                match behavior {
                    MissingChildBehavior::Throw => {
                        return Err(BuildError::MissingChild {
                            parent: path.clone(),
                            child: child_name.clone(),
                        })
                    }
                    MissingChildBehavior::CreateEmptyNode => AstNode::placed(child_name.clone(), child_path),
                }
            };
            node.children.insert(child_name.clone(), child);
        }

        Ok(node)
    }
}

#[cfg(test)]
mod tests;
