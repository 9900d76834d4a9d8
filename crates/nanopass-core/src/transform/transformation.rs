/*!
# Transformations

The unit of rewrite. A [`Transformation`] offers one operation per granularity;
[`TransformationDescription`] pairs it with an optional [`Pattern`] guard and the
name under which it shows up in logs and summaries.
*/

use std::fmt;
use std::sync::Arc;

use crate::ast::{AstNode, AstNodeHierarchy, AstNodeMember};

use super::pattern::Pattern;
use super::TransformResult;

/// Core trait for rewrite rules.
///
/// Every operation defaults to returning its input unchanged, so a rule only
/// implements the granularities it cares about. Errors abort the pass.
pub trait Transformation: Send + Sync {
    /// Human-readable name, used when a description is not named explicitly
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Rewrite the whole hierarchy. There is no way to delete the tree itself.
    fn apply_to_tree(&self, tree: AstNodeHierarchy) -> TransformResult<AstNodeHierarchy> {
        Ok(tree)
    }

    /// Rewrite one node. `None` removes the node and its subtree.
    fn apply_to_node(&self, tree: &AstNodeHierarchy, node: AstNode) -> TransformResult<Option<AstNode>> {
        let _ = tree;
        Ok(Some(node))
    }

    /// Rewrite one member of `node`. `None` removes the member.
    fn apply_to_member(
        &self,
        tree: &AstNodeHierarchy,
        node: &AstNode,
        member: AstNodeMember,
    ) -> TransformResult<Option<AstNodeMember>> {
        let _ = (tree, node);
        Ok(Some(member))
    }
}

impl<T: Transformation + ?Sized> Transformation for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn apply_to_tree(&self, tree: AstNodeHierarchy) -> TransformResult<AstNodeHierarchy> {
        (**self).apply_to_tree(tree)
    }

    fn apply_to_node(&self, tree: &AstNodeHierarchy, node: AstNode) -> TransformResult<Option<AstNode>> {
        (**self).apply_to_node(tree, node)
    }

    fn apply_to_member(
        &self,
        tree: &AstNodeHierarchy,
        node: &AstNode,
        member: AstNodeMember,
    ) -> TransformResult<Option<AstNodeMember>> {
        (**self).apply_to_member(tree, node, member)
    }
}

/// A transformation together with its optional guard
#[derive(Clone)]
pub struct TransformationDescription {
    pub name: String,
    pub documentation: Option<String>,
    pattern: Option<Arc<dyn Pattern>>,
    transformation: Arc<dyn Transformation>,
}

impl TransformationDescription {
    /// Unguarded description named after the transformation
    pub fn new<T: Transformation + 'static>(transformation: T) -> Self {
        Self {
            name: transformation.name().to_string(),
            documentation: None,
            pattern: None,
            transformation: Arc::new(transformation),
        }
    }

    pub fn from_arc(transformation: Arc<dyn Transformation>) -> Self {
        Self {
            name: transformation.name().to_string(),
            documentation: None,
            pattern: None,
            transformation,
        }
    }

    pub fn with_pattern<P: Pattern + 'static>(mut self, pattern: P) -> Self {
        self.pattern = Some(Arc::new(pattern));
        self
    }

    pub fn with_shared_pattern(mut self, pattern: Arc<dyn Pattern>) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn pattern(&self) -> Option<&Arc<dyn Pattern>> {
        self.pattern.as_ref()
    }

    pub fn transformation(&self) -> &Arc<dyn Transformation> {
        &self.transformation
    }

    /// Guard at tree granularity; unguarded descriptions always match
    pub fn matches_tree(&self, tree: &AstNodeHierarchy) -> bool {
        self.pattern.as_ref().map_or(true, |p| p.matches_tree(tree))
    }

    pub fn matches_node(&self, tree: &AstNodeHierarchy, node: &AstNode) -> bool {
        self.pattern.as_ref().map_or(true, |p| p.matches_node(tree, node))
    }

    pub fn matches_member(&self, tree: &AstNodeHierarchy, node: &AstNode, member: &AstNodeMember) -> bool {
        self.pattern
            .as_ref()
            .map_or(true, |p| p.matches_member(tree, node, member))
    }
}

impl fmt::Debug for TransformationDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformationDescription")
            .field("name", &self.name)
            .field("documentation", &self.documentation)
            .field("pattern", &self.pattern.as_ref().map(|_| "<pattern>"))
            .field("transformation", &self.transformation.name())
            .finish()
    }
}
