/*!
# Built-in Transformations

The small fixed set of rewrite rules most passes are made of, plus closure-backed
rules ([`Rewrite`]) as the open extension point and [`CompositeTransformation`] for
bundling several rules under one description.

Which nodes or members a rule touches is decided by the description's pattern;
member-level rules such as [`RemoveMember`] additionally check the member name so
they can be paired with node-scoped patterns.
*/

use std::sync::Arc;

use crate::ast::{AstNode, AstNodeHierarchy, AstNodeMember, AttributeValue};

use super::transformation::Transformation;
use super::TransformResult;

/// Append (or replace) a root
pub struct AddRoot {
    root: AstNode,
}

impl AddRoot {
    pub fn new(root: AstNode) -> Self {
        Self { root }
    }
}

impl Transformation for AddRoot {
    fn name(&self) -> &str {
        "AddRoot"
    }

    fn apply_to_tree(&self, tree: AstNodeHierarchy) -> TransformResult<AstNodeHierarchy> {
        Ok(tree.with_root(self.root.clone()))
    }
}

/// Drop a root by name
pub struct RemoveRoot {
    name: String,
}

impl RemoveRoot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Transformation for RemoveRoot {
    fn name(&self) -> &str {
        "RemoveRoot"
    }

    fn apply_to_tree(&self, tree: AstNodeHierarchy) -> TransformResult<AstNodeHierarchy> {
        Ok(tree.without_root(&self.name))
    }
}

/// Add a member to every matched node, replacing a member with the same name
pub struct AddMember {
    member: AstNodeMember,
}

impl AddMember {
    pub fn new(member: AstNodeMember) -> Self {
        Self { member }
    }
}

impl Transformation for AddMember {
    fn name(&self) -> &str {
        "AddMember"
    }

    fn apply_to_node(&self, _tree: &AstNodeHierarchy, node: AstNode) -> TransformResult<Option<AstNode>> {
        Ok(Some(node.with_member(self.member.clone())))
    }
}

/// Remove the member called `name`
pub struct RemoveMember {
    name: String,
}

impl RemoveMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Transformation for RemoveMember {
    fn name(&self) -> &str {
        "RemoveMember"
    }

    fn apply_to_member(
        &self,
        _tree: &AstNodeHierarchy,
        _node: &AstNode,
        member: AstNodeMember,
    ) -> TransformResult<Option<AstNodeMember>> {
        if member.name == self.name {
            return Ok(None);
        }
        Ok(Some(member))
    }
}

/// Rename member `from` to `to`
pub struct RenameMember {
    from: String,
    to: String,
}

impl RenameMember {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Transformation for RenameMember {
    fn name(&self) -> &str {
        "RenameMember"
    }

    fn apply_to_member(
        &self,
        _tree: &AstNodeHierarchy,
        _node: &AstNode,
        member: AstNodeMember,
    ) -> TransformResult<Option<AstNodeMember>> {
        if member.name == self.from {
            return Ok(Some(member.with_name(self.to.clone())));
        }
        Ok(Some(member))
    }
}

/// Set (or clear) the declared type of a member
pub struct RetypeMember {
    member: String,
    type_name: Option<String>,
}

impl RetypeMember {
    pub fn new(member: impl Into<String>, type_name: Option<String>) -> Self {
        Self {
            member: member.into(),
            type_name,
        }
    }
}

impl Transformation for RetypeMember {
    fn name(&self) -> &str {
        "RetypeMember"
    }

    fn apply_to_member(
        &self,
        _tree: &AstNodeHierarchy,
        _node: &AstNode,
        mut member: AstNodeMember,
    ) -> TransformResult<Option<AstNodeMember>> {
        if member.name == self.member {
            member.type_name = self.type_name.clone();
        }
        Ok(Some(member))
    }
}

/// Set (or clear) the documentation of a member
pub struct DocumentMember {
    member: String,
    documentation: Option<String>,
}

impl DocumentMember {
    pub fn new(member: impl Into<String>, documentation: Option<String>) -> Self {
        Self {
            member: member.into(),
            documentation,
        }
    }
}

impl Transformation for DocumentMember {
    fn name(&self) -> &str {
        "DocumentMember"
    }

    fn apply_to_member(
        &self,
        _tree: &AstNodeHierarchy,
        _node: &AstNode,
        mut member: AstNodeMember,
    ) -> TransformResult<Option<AstNodeMember>> {
        if member.name == self.member {
            member.documentation = self.documentation.clone();
        }
        Ok(Some(member))
    }
}

/// Add (or replace) a child under every matched node
pub struct AddChild {
    child: AstNode,
}

impl AddChild {
    pub fn new(child: AstNode) -> Self {
        Self { child }
    }
}

impl Transformation for AddChild {
    fn name(&self) -> &str {
        "AddChild"
    }

    fn apply_to_node(&self, _tree: &AstNodeHierarchy, node: AstNode) -> TransformResult<Option<AstNode>> {
        Ok(Some(node.with_child(self.child.clone())))
    }
}

/// Drop the child called `name` (and its subtree) from every matched node
pub struct RemoveChild {
    name: String,
}

impl RemoveChild {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Transformation for RemoveChild {
    fn name(&self) -> &str {
        "RemoveChild"
    }

    fn apply_to_node(&self, _tree: &AstNodeHierarchy, node: AstNode) -> TransformResult<Option<AstNode>> {
        Ok(Some(node.without_child(&self.name)))
    }
}

/// Delete every matched node
pub struct RemoveNode;

impl Transformation for RemoveNode {
    fn name(&self) -> &str {
        "RemoveNode"
    }

    fn apply_to_node(&self, _tree: &AstNodeHierarchy, _node: AstNode) -> TransformResult<Option<AstNode>> {
        Ok(None)
    }
}

/// Rename every matched node
pub struct RenameNode {
    to: String,
}

impl RenameNode {
    pub fn new(to: impl Into<String>) -> Self {
        Self { to: to.into() }
    }
}

impl Transformation for RenameNode {
    fn name(&self) -> &str {
        "RenameNode"
    }

    fn apply_to_node(&self, _tree: &AstNodeHierarchy, mut node: AstNode) -> TransformResult<Option<AstNode>> {
        node.name = self.to.clone();
        Ok(Some(node))
    }
}

/// Set (or clear) node documentation
pub struct SetDocumentation {
    documentation: Option<String>,
}

impl SetDocumentation {
    pub fn new(documentation: Option<String>) -> Self {
        Self { documentation }
    }
}

impl Transformation for SetDocumentation {
    fn name(&self) -> &str {
        "SetDocumentation"
    }

    fn apply_to_node(&self, _tree: &AstNodeHierarchy, mut node: AstNode) -> TransformResult<Option<AstNode>> {
        node.documentation = self.documentation.clone();
        Ok(Some(node))
    }
}

/// Which part of the tree an attribute rule edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeTarget {
    Node,
    Member,
}

/// Add an attribute to matched nodes or members
pub struct AddAttribute {
    value: AttributeValue,
    target: AttributeTarget,
}

impl AddAttribute {
    pub fn new(value: AttributeValue, target: AttributeTarget) -> Self {
        Self { value, target }
    }
}

impl Transformation for AddAttribute {
    fn name(&self) -> &str {
        "AddAttribute"
    }

    fn apply_to_node(&self, _tree: &AstNodeHierarchy, mut node: AstNode) -> TransformResult<Option<AstNode>> {
        if self.target == AttributeTarget::Node {
            node.attributes.insert(self.value.clone());
        }
        Ok(Some(node))
    }

    fn apply_to_member(
        &self,
        _tree: &AstNodeHierarchy,
        _node: &AstNode,
        mut member: AstNodeMember,
    ) -> TransformResult<Option<AstNodeMember>> {
        if self.target == AttributeTarget::Member {
            member.attributes.insert(self.value.clone());
        }
        Ok(Some(member))
    }
}

/// Remove every attribute with `key` from matched nodes or members
pub struct RemoveAttribute {
    key: String,
    target: AttributeTarget,
}

impl RemoveAttribute {
    pub fn new(key: impl Into<String>, target: AttributeTarget) -> Self {
        Self {
            key: key.into(),
            target,
        }
    }
}

impl Transformation for RemoveAttribute {
    fn name(&self) -> &str {
        "RemoveAttribute"
    }

    fn apply_to_node(&self, _tree: &AstNodeHierarchy, mut node: AstNode) -> TransformResult<Option<AstNode>> {
        if self.target == AttributeTarget::Node {
            node.attributes.remove_key(&self.key);
        }
        Ok(Some(node))
    }

    fn apply_to_member(
        &self,
        _tree: &AstNodeHierarchy,
        _node: &AstNode,
        mut member: AstNodeMember,
    ) -> TransformResult<Option<AstNodeMember>> {
        if self.target == AttributeTarget::Member {
            member.attributes.remove_key(&self.key);
        }
        Ok(Some(member))
    }
}

/// Closure-backed rule constructors
pub struct Rewrite;

impl Rewrite {
    pub fn tree<F>(name: &'static str, rewrite: F) -> TreeRewrite<F>
    where
        F: Fn(AstNodeHierarchy) -> TransformResult<AstNodeHierarchy> + Send + Sync,
    {
        TreeRewrite { name, rewrite }
    }

    pub fn node<F>(name: &'static str, rewrite: F) -> NodeRewrite<F>
    where
        F: Fn(&AstNodeHierarchy, AstNode) -> TransformResult<Option<AstNode>> + Send + Sync,
    {
        NodeRewrite { name, rewrite }
    }

    pub fn member<F>(name: &'static str, rewrite: F) -> MemberRewrite<F>
    where
        F: Fn(&AstNodeHierarchy, &AstNode, AstNodeMember) -> TransformResult<Option<AstNodeMember>> + Send + Sync,
    {
        MemberRewrite { name, rewrite }
    }
}

pub struct TreeRewrite<F>
where
    F: Fn(AstNodeHierarchy) -> TransformResult<AstNodeHierarchy> + Send + Sync,
{
    name: &'static str,
    rewrite: F,
}

impl<F> Transformation for TreeRewrite<F>
where
    F: Fn(AstNodeHierarchy) -> TransformResult<AstNodeHierarchy> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    fn apply_to_tree(&self, tree: AstNodeHierarchy) -> TransformResult<AstNodeHierarchy> {
        (self.rewrite)(tree)
    }
}

pub struct NodeRewrite<F>
where
    F: Fn(&AstNodeHierarchy, AstNode) -> TransformResult<Option<AstNode>> + Send + Sync,
{
    name: &'static str,
    rewrite: F,
}

impl<F> Transformation for NodeRewrite<F>
where
    F: Fn(&AstNodeHierarchy, AstNode) -> TransformResult<Option<AstNode>> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    fn apply_to_node(&self, tree: &AstNodeHierarchy, node: AstNode) -> TransformResult<Option<AstNode>> {
        (self.rewrite)(tree, node)
    }
}

pub struct MemberRewrite<F>
where
    F: Fn(&AstNodeHierarchy, &AstNode, AstNodeMember) -> TransformResult<Option<AstNodeMember>> + Send + Sync,
{
    name: &'static str,
    rewrite: F,
}

impl<F> Transformation for MemberRewrite<F>
where
    F: Fn(&AstNodeHierarchy, &AstNode, AstNodeMember) -> TransformResult<Option<AstNodeMember>> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    fn apply_to_member(
        &self,
        tree: &AstNodeHierarchy,
        node: &AstNode,
        member: AstNodeMember,
    ) -> TransformResult<Option<AstNodeMember>> {
        (self.rewrite)(tree, node, member)
    }
}

/// A rule that applies several rules in sequence at every granularity.
/// Once one of them removes the node or member, the rest are skipped.
pub struct CompositeTransformation {
    name: String,
    rules: Vec<Arc<dyn Transformation>>,
}

impl CompositeTransformation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn add_rule<T: Transformation + 'static>(mut self, rule: T) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Transformation for CompositeTransformation {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply_to_tree(&self, mut tree: AstNodeHierarchy) -> TransformResult<AstNodeHierarchy> {
        for rule in &self.rules {
            tree = rule.apply_to_tree(tree)?;
        }
        Ok(tree)
    }

    fn apply_to_node(&self, tree: &AstNodeHierarchy, node: AstNode) -> TransformResult<Option<AstNode>> {
        let mut current = node;
        for rule in &self.rules {
            match rule.apply_to_node(tree, current)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    fn apply_to_member(
        &self,
        tree: &AstNodeHierarchy,
        node: &AstNode,
        member: AstNodeMember,
    ) -> TransformResult<Option<AstNodeMember>> {
        let mut current = member;
        for rule in &self.rules {
            match rule.apply_to_member(tree, node, current)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}
