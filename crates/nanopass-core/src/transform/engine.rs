/*!
# PassTransformer - Per-Pass Rewrite Engine

Applies the ordered transformation list of one pass to a hierarchy and produces a
new hierarchy. Every granularity is handled in a single traversal: the tree-level
fold runs first, then a depth-first pre-order walk folds all descriptions over each
node and each of its members. Results are staged into a fresh [`HierarchyBuilder`]
under their new paths and built once at the end, so a rename never lands on an
entry that still belongs to an unvisited node or member.

Guards are evaluated against the context: the tree produced by the tree-level fold,
and the node or member as it entered the fold. Each transformation receives the
value left by the descriptions before it.
*/

use tracing::{debug, debug_span, trace};

use crate::ast::{AstNode, AstNodeHierarchy, AstNodeMember};
use crate::builder::{BuildError, HierarchyBuilder, MemberBuilder, MissingChildBehavior};
use crate::path::NodePath;

use super::transformation::TransformationDescription;
use super::TransformResult;

/// Per-pass transformation engine
#[derive(Debug, Clone, Default)]
pub struct PassTransformer {
    missing_child_behavior: MissingChildBehavior,
    trace_nodes: bool,
}

impl PassTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy used when the final build finds a declared child without a builder
    pub fn missing_child_behavior(mut self, behavior: MissingChildBehavior) -> Self {
        self.missing_child_behavior = behavior;
        self
    }

    /// Emit a trace event for every visited node
    pub fn trace_nodes(mut self, enabled: bool) -> Self {
        self.trace_nodes = enabled;
        self
    }

    /// Apply `descriptions` to `hierarchy`
    pub fn apply(
        &self,
        hierarchy: &AstNodeHierarchy,
        descriptions: &[TransformationDescription],
    ) -> TransformResult<AstNodeHierarchy> {
        self.apply_with_summary(hierarchy, descriptions)
            .map(|(hierarchy, _)| hierarchy)
    }

    /// Apply `descriptions` to `hierarchy` and report what changed
    pub fn apply_with_summary(
        &self,
        hierarchy: &AstNodeHierarchy,
        descriptions: &[TransformationDescription],
    ) -> TransformResult<(AstNodeHierarchy, TransformationSummary)> {
        let mut summary = TransformationSummary::new();
        if descriptions.is_empty() {
            return Ok((hierarchy.clone(), summary));
        }

        let _span = debug_span!("apply_pass", transformations = descriptions.len()).entered();

        let mut tree = hierarchy.clone();
        for description in descriptions {
            if !description.matches_tree(&tree) {
                continue;
            }
            let next = description.transformation().apply_to_tree(tree.clone())?;
            if next != tree {
                summary.tree_rewrites += 1;
                trace!(transformation = %description.name, "applied tree transformation");
            }
            tree = next;
        }

        let mut builder = HierarchyBuilder::new();
        for root in tree.roots() {
            self.visit(&tree, root, None, &mut builder, descriptions, &mut summary)?;
        }

        let result = builder.build(self.missing_child_behavior)?;
        debug!(
            visited = summary.nodes_visited,
            removed = summary.nodes_removed,
            members_rewritten = summary.members_rewritten,
            "pass applied"
        );
        Ok((result, summary))
    }

    /// Fold `node`, stage the result under `parent` (a root when `None`) and
    /// recurse into the transformed node's children.
    fn visit(
        &self,
        tree: &AstNodeHierarchy,
        node: &AstNode,
        parent: Option<&NodePath>,
        builder: &mut HierarchyBuilder,
        descriptions: &[TransformationDescription],
        summary: &mut TransformationSummary,
    ) -> TransformResult<()> {
        summary.nodes_visited += 1;
        if self.trace_nodes {
            trace!(path = %node.path(), "visiting node");
        }

        let Some(transformed) = self.fold_node(tree, node, descriptions)? else {
            summary.nodes_removed += 1;
            debug!(path = %node.path(), "removed node");
            return Ok(());
        };

        let path = match parent {
            Some(parent) => parent.child(transformed.name.clone()),
            None => NodePath::root(transformed.name.clone()),
        };
        if builder.contains(&path) {
            return Err(BuildError::DuplicateNode { path }.into());
        }
        if transformed.name != node.name {
            summary.nodes_renamed += 1;
            debug!(from = %node.path(), to = %path, "renamed node");
        }

        record_structural_changes(node, &transformed, &path, summary);
        let members = self.fold_members(tree, node, &transformed, descriptions, summary)?;

        let entry = match parent {
            Some(parent) => builder
                .add_child(parent, transformed.name.clone())
                .ok_or_else(|| BuildError::NodeNotFound { path: parent.clone() })?,
            None => builder.add_root(transformed.name.clone()),
        };
        entry.documentation = transformed.documentation.clone();
        entry.attributes = transformed.attributes.clone();
        for member in members {
            entry.add_member(member);
        }

        for child in transformed.children.values() {
            self.visit(tree, child, Some(&path), builder, descriptions, summary)?;
        }
        Ok(())
    }

    /// Fold every matching description over the node; `None` means removed.
    /// Guards see `node` itself, transformations see the running result.
    fn fold_node(
        &self,
        tree: &AstNodeHierarchy,
        node: &AstNode,
        descriptions: &[TransformationDescription],
    ) -> TransformResult<Option<AstNode>> {
        let mut current = node.clone();
        for description in descriptions {
            if !description.matches_node(tree, node) {
                continue;
            }
            match description.transformation().apply_to_node(tree, current)? {
                Some(next) => current = next,
                None => {
                    trace!(transformation = %description.name, "node removed by transformation");
                    return Ok(None);
                }
            }
        }
        Ok(Some(current))
    }

    /// Fold every member of the transformed node independently and return the
    /// survivors in declaration order. Name clashes are left to the build.
    fn fold_members(
        &self,
        tree: &AstNodeHierarchy,
        original: &AstNode,
        transformed: &AstNode,
        descriptions: &[TransformationDescription],
        summary: &mut TransformationSummary,
    ) -> TransformResult<Vec<MemberBuilder>> {
        let mut staged = Vec::with_capacity(transformed.members.len());
        for member in transformed.members.values() {
            match self.fold_member(tree, original, transformed, member, descriptions)? {
                None => {
                    summary.members_removed += 1;
                    debug!(node = %original.path(), member = %member.name, "removed member");
                }
                Some(rewritten) => {
                    if rewritten != *member {
                        summary.members_rewritten += 1;
                    }
                    staged.push(MemberBuilder::from_member(&rewritten));
                }
            }
        }
        Ok(staged)
    }

    /// Fold every matching description over one member; `None` means removed
    fn fold_member(
        &self,
        tree: &AstNodeHierarchy,
        original: &AstNode,
        node: &AstNode,
        member: &AstNodeMember,
        descriptions: &[TransformationDescription],
    ) -> TransformResult<Option<AstNodeMember>> {
        let mut current = member.clone();
        for description in descriptions {
            if !description.matches_member(tree, original, member) {
                continue;
            }
            match description.transformation().apply_to_member(tree, node, current)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

/// Count children and members a node-level fold added or dropped
fn record_structural_changes(
    original: &AstNode,
    transformed: &AstNode,
    path: &NodePath,
    summary: &mut TransformationSummary,
) {
    for name in original.child_names().filter(|name| !transformed.has_child(name)) {
        summary.children_removed += 1;
        debug!(parent = %path, child = %name, "removed child");
    }
    for name in transformed.child_names().filter(|name| !original.has_child(name)) {
        summary.children_added += 1;
        debug!(parent = %path, child = %name, "added child");
    }
    summary.members_removed += original
        .member_names()
        .filter(|name| !transformed.has_member(name))
        .count() as u64;
    summary.members_added += transformed
        .member_names()
        .filter(|name| !original.has_member(name))
        .count() as u64;
}

/// Summary of one pass application
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationSummary {
    pub tree_rewrites: u64,
    pub nodes_visited: u64,
    pub nodes_removed: u64,
    pub nodes_renamed: u64,
    pub children_added: u64,
    pub children_removed: u64,
    pub members_added: u64,
    pub members_rewritten: u64,
    pub members_removed: u64,
}

impl TransformationSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: TransformationSummary) {
        self.tree_rewrites += other.tree_rewrites;
        self.nodes_visited += other.nodes_visited;
        self.nodes_removed += other.nodes_removed;
        self.nodes_renamed += other.nodes_renamed;
        self.children_added += other.children_added;
        self.children_removed += other.children_removed;
        self.members_added += other.members_added;
        self.members_rewritten += other.members_rewritten;
        self.members_removed += other.members_removed;
    }

    /// True if the pass changed the structure or any member
    pub fn changed(&self) -> bool {
        self.tree_rewrites > 0
            || self.nodes_removed > 0
            || self.nodes_renamed > 0
            || self.children_added > 0
            || self.children_removed > 0
            || self.members_added > 0
            || self.members_rewritten > 0
            || self.members_removed > 0
    }
}
