/*!
# Transformation Guards

A [`Pattern`] decides whether a transformation applies. It is queried at three
granularities (tree, node, member) and each granularity is independent: a pattern
that does not implement one simply never matches there.

Node-scoped patterns built by [`PatternMatcher`] also match every member of a
matching node, so "remove member `id` from nodes named `Person`" is a node pattern
paired with a member-level transformation.
*/

use std::sync::Arc;

use crate::ast::{AstNode, AstNodeHierarchy, AstNodeMember};
use crate::path::NodePath;

/// Guard predicate for a transformation
pub trait Pattern: Send + Sync {
    fn matches_tree(&self, tree: &AstNodeHierarchy) -> bool {
        let _ = tree;
        false
    }

    fn matches_node(&self, tree: &AstNodeHierarchy, node: &AstNode) -> bool {
        let _ = (tree, node);
        false
    }

    fn matches_member(&self, tree: &AstNodeHierarchy, node: &AstNode, member: &AstNodeMember) -> bool {
        let _ = (tree, node, member);
        false
    }
}

impl<P: Pattern + ?Sized> Pattern for Box<P> {
    fn matches_tree(&self, tree: &AstNodeHierarchy) -> bool {
        (**self).matches_tree(tree)
    }

    fn matches_node(&self, tree: &AstNodeHierarchy, node: &AstNode) -> bool {
        (**self).matches_node(tree, node)
    }

    fn matches_member(&self, tree: &AstNodeHierarchy, node: &AstNode, member: &AstNodeMember) -> bool {
        (**self).matches_member(tree, node, member)
    }
}

impl<P: Pattern + ?Sized> Pattern for Arc<P> {
    fn matches_tree(&self, tree: &AstNodeHierarchy) -> bool {
        (**self).matches_tree(tree)
    }

    fn matches_node(&self, tree: &AstNodeHierarchy, node: &AstNode) -> bool {
        (**self).matches_node(tree, node)
    }

    fn matches_member(&self, tree: &AstNodeHierarchy, node: &AstNode, member: &AstNodeMember) -> bool {
        (**self).matches_member(tree, node, member)
    }
}

/// Pattern constructors
pub struct PatternMatcher;

impl PatternMatcher {
    /// Match everything at every granularity
    pub fn always() -> ConstantPattern {
        ConstantPattern(true)
    }

    /// Match nothing
    pub fn never() -> ConstantPattern {
        ConstantPattern(false)
    }

    /// Match nodes with the given name
    pub fn node_named(name: impl Into<String>) -> NodeMatcher<impl Fn(&AstNodeHierarchy, &AstNode) -> bool + Send + Sync> {
        let name = name.into();
        NodeMatcher {
            predicate: move |_: &AstNodeHierarchy, node: &AstNode| node.name == name,
        }
    }

    /// Match the node at exactly this path
    pub fn node_at(path: NodePath) -> NodeMatcher<impl Fn(&AstNodeHierarchy, &AstNode) -> bool + Send + Sync> {
        NodeMatcher {
            predicate: move |_: &AstNodeHierarchy, node: &AstNode| *node.path() == path,
        }
    }

    /// Match the node at `prefix` and everything below it
    pub fn under(prefix: NodePath) -> NodeMatcher<impl Fn(&AstNodeHierarchy, &AstNode) -> bool + Send + Sync> {
        NodeMatcher {
            predicate: move |_: &AstNodeHierarchy, node: &AstNode| node.path().starts_with(&prefix),
        }
    }

    /// Match nodes at a given depth (roots are depth 0)
    pub fn depth(depth: usize) -> NodeMatcher<impl Fn(&AstNodeHierarchy, &AstNode) -> bool + Send + Sync> {
        NodeMatcher {
            predicate: move |_: &AstNodeHierarchy, node: &AstNode| node.depth() == depth,
        }
    }

    /// Match roots only
    pub fn root() -> NodeMatcher<impl Fn(&AstNodeHierarchy, &AstNode) -> bool + Send + Sync> {
        Self::depth(0)
    }

    /// Match nodes carrying an attribute with this key
    pub fn node_with_attribute(key: impl Into<String>) -> NodeMatcher<impl Fn(&AstNodeHierarchy, &AstNode) -> bool + Send + Sync> {
        let key = key.into();
        NodeMatcher {
            predicate: move |_: &AstNodeHierarchy, node: &AstNode| node.attributes.contains_key(&key),
        }
    }

    /// Match nodes that declare a member with this name
    pub fn has_member(name: impl Into<String>) -> NodeMatcher<impl Fn(&AstNodeHierarchy, &AstNode) -> bool + Send + Sync> {
        let name = name.into();
        NodeMatcher {
            predicate: move |_: &AstNodeHierarchy, node: &AstNode| node.has_member(&name),
        }
    }

    /// Match nodes that have no children
    pub fn leaf() -> NodeMatcher<impl Fn(&AstNodeHierarchy, &AstNode) -> bool + Send + Sync> {
        NodeMatcher {
            predicate: |_: &AstNodeHierarchy, node: &AstNode| node.children.is_empty(),
        }
    }

    /// Match members with the given name
    pub fn member_named(name: impl Into<String>) -> MemberMatcher<impl Fn(&AstNodeHierarchy, &AstNode, &AstNodeMember) -> bool + Send + Sync> {
        let name = name.into();
        MemberMatcher {
            predicate: move |_: &AstNodeHierarchy, _: &AstNode, member: &AstNodeMember| member.name == name,
        }
    }

    /// Match members declared with the given type
    pub fn member_typed(type_name: impl Into<String>) -> MemberMatcher<impl Fn(&AstNodeHierarchy, &AstNode, &AstNodeMember) -> bool + Send + Sync> {
        let type_name = type_name.into();
        MemberMatcher {
            predicate: move |_: &AstNodeHierarchy, _: &AstNode, member: &AstNodeMember| {
                member.type_name.as_deref() == Some(type_name.as_str())
            },
        }
    }

    /// Match members carrying an attribute with this key
    pub fn member_with_attribute(key: impl Into<String>) -> MemberMatcher<impl Fn(&AstNodeHierarchy, &AstNode, &AstNodeMember) -> bool + Send + Sync> {
        let key = key.into();
        MemberMatcher {
            predicate: move |_: &AstNodeHierarchy, _: &AstNode, member: &AstNodeMember| {
                member.attributes.contains_key(&key)
            },
        }
    }

    /// Match at every granularity while the tree contains `path`
    pub fn tree_contains(path: NodePath) -> TreeMatcher<impl Fn(&AstNodeHierarchy) -> bool + Send + Sync> {
        TreeMatcher {
            predicate: move |tree: &AstNodeHierarchy| tree.contains(&path),
        }
    }

    /// Closure-backed tree predicate (applies at every granularity)
    pub fn tree_fn<F>(predicate: F) -> TreeMatcher<F>
    where
        F: Fn(&AstNodeHierarchy) -> bool + Send + Sync,
    {
        TreeMatcher { predicate }
    }

    /// Closure-backed node predicate (also matches the node's members)
    pub fn node_fn<F>(predicate: F) -> NodeMatcher<F>
    where
        F: Fn(&AstNodeHierarchy, &AstNode) -> bool + Send + Sync,
    {
        NodeMatcher { predicate }
    }

    /// Closure-backed member predicate
    pub fn member_fn<F>(predicate: F) -> MemberMatcher<F>
    where
        F: Fn(&AstNodeHierarchy, &AstNode, &AstNodeMember) -> bool + Send + Sync,
    {
        MemberMatcher { predicate }
    }

    /// Combine patterns with AND logic
    pub fn and<P1: Pattern, P2: Pattern>(p1: P1, p2: P2) -> AndPattern<P1, P2> {
        AndPattern { p1, p2 }
    }

    /// Combine patterns with OR logic
    pub fn or<P1: Pattern, P2: Pattern>(p1: P1, p2: P2) -> OrPattern<P1, P2> {
        OrPattern { p1, p2 }
    }

    /// Combine patterns with XOR logic
    pub fn xor<P1: Pattern, P2: Pattern>(p1: P1, p2: P2) -> XorPattern<P1, P2> {
        XorPattern { p1, p2 }
    }

    /// Negate a pattern
    pub fn not<P: Pattern>(pattern: P) -> NotPattern<P> {
        NotPattern { pattern }
    }

    /// Match when every pattern matches (an empty list always matches)
    pub fn all(patterns: Vec<Box<dyn Pattern>>) -> AllPattern {
        AllPattern { patterns }
    }

    /// Match when at least one pattern matches (an empty list never matches)
    pub fn any(patterns: Vec<Box<dyn Pattern>>) -> AnyPattern {
        AnyPattern { patterns }
    }
}

/// Chaining helpers for any pattern
pub trait PatternExt: Pattern + Sized {
    fn and<P: Pattern>(self, other: P) -> AndPattern<Self, P> {
        PatternMatcher::and(self, other)
    }

    fn or<P: Pattern>(self, other: P) -> OrPattern<Self, P> {
        PatternMatcher::or(self, other)
    }

    fn xor<P: Pattern>(self, other: P) -> XorPattern<Self, P> {
        PatternMatcher::xor(self, other)
    }

    fn negate(self) -> NotPattern<Self> {
        PatternMatcher::not(self)
    }

    fn boxed(self) -> Box<dyn Pattern>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<P: Pattern + Sized> PatternExt for P {}

/// Matches (or rejects) unconditionally
#[derive(Debug, Clone, Copy)]
pub struct ConstantPattern(bool);

impl Pattern for ConstantPattern {
    fn matches_tree(&self, _tree: &AstNodeHierarchy) -> bool {
        self.0
    }

    fn matches_node(&self, _tree: &AstNodeHierarchy, _node: &AstNode) -> bool {
        self.0
    }

    fn matches_member(&self, _tree: &AstNodeHierarchy, _node: &AstNode, _member: &AstNodeMember) -> bool {
        self.0
    }
}

/// Predicate over the whole tree; applies at every granularity
pub struct TreeMatcher<F>
where
    F: Fn(&AstNodeHierarchy) -> bool + Send + Sync,
{
    predicate: F,
}

impl<F> Pattern for TreeMatcher<F>
where
    F: Fn(&AstNodeHierarchy) -> bool + Send + Sync,
{
    fn matches_tree(&self, tree: &AstNodeHierarchy) -> bool {
        (self.predicate)(tree)
    }

    fn matches_node(&self, tree: &AstNodeHierarchy, _node: &AstNode) -> bool {
        (self.predicate)(tree)
    }

    fn matches_member(&self, tree: &AstNodeHierarchy, _node: &AstNode, _member: &AstNodeMember) -> bool {
        (self.predicate)(tree)
    }
}

/// Predicate over a node; its members match when the node does
pub struct NodeMatcher<F>
where
    F: Fn(&AstNodeHierarchy, &AstNode) -> bool + Send + Sync,
{
    predicate: F,
}

impl<F> Pattern for NodeMatcher<F>
where
    F: Fn(&AstNodeHierarchy, &AstNode) -> bool + Send + Sync,
{
    fn matches_node(&self, tree: &AstNodeHierarchy, node: &AstNode) -> bool {
        (self.predicate)(tree, node)
    }

    fn matches_member(&self, tree: &AstNodeHierarchy, node: &AstNode, _member: &AstNodeMember) -> bool {
        (self.predicate)(tree, node)
    }
}

/// Predicate over a member; never matches at tree or node granularity
pub struct MemberMatcher<F>
where
    F: Fn(&AstNodeHierarchy, &AstNode, &AstNodeMember) -> bool + Send + Sync,
{
    predicate: F,
}

impl<F> Pattern for MemberMatcher<F>
where
    F: Fn(&AstNodeHierarchy, &AstNode, &AstNodeMember) -> bool + Send + Sync,
{
    fn matches_member(&self, tree: &AstNodeHierarchy, node: &AstNode, member: &AstNodeMember) -> bool {
        (self.predicate)(tree, node, member)
    }
}

/// AND pattern combinator
pub struct AndPattern<P1: Pattern, P2: Pattern> {
    p1: P1,
    p2: P2,
}

impl<P1: Pattern, P2: Pattern> Pattern for AndPattern<P1, P2> {
    fn matches_tree(&self, tree: &AstNodeHierarchy) -> bool {
        self.p1.matches_tree(tree) && self.p2.matches_tree(tree)
    }

    fn matches_node(&self, tree: &AstNodeHierarchy, node: &AstNode) -> bool {
        self.p1.matches_node(tree, node) && self.p2.matches_node(tree, node)
    }

    fn matches_member(&self, tree: &AstNodeHierarchy, node: &AstNode, member: &AstNodeMember) -> bool {
        self.p1.matches_member(tree, node, member) && self.p2.matches_member(tree, node, member)
    }
}

/// OR pattern combinator
pub struct OrPattern<P1: Pattern, P2: Pattern> {
    p1: P1,
    p2: P2,
}

impl<P1: Pattern, P2: Pattern> Pattern for OrPattern<P1, P2> {
    fn matches_tree(&self, tree: &AstNodeHierarchy) -> bool {
        self.p1.matches_tree(tree) || self.p2.matches_tree(tree)
    }

    fn matches_node(&self, tree: &AstNodeHierarchy, node: &AstNode) -> bool {
        self.p1.matches_node(tree, node) || self.p2.matches_node(tree, node)
    }

    fn matches_member(&self, tree: &AstNodeHierarchy, node: &AstNode, member: &AstNodeMember) -> bool {
        self.p1.matches_member(tree, node, member) || self.p2.matches_member(tree, node, member)
    }
}

/// XOR pattern combinator
pub struct XorPattern<P1: Pattern, P2: Pattern> {
    p1: P1,
    p2: P2,
}

impl<P1: Pattern, P2: Pattern> Pattern for XorPattern<P1, P2> {
    fn matches_tree(&self, tree: &AstNodeHierarchy) -> bool {
        self.p1.matches_tree(tree) != self.p2.matches_tree(tree)
    }

    fn matches_node(&self, tree: &AstNodeHierarchy, node: &AstNode) -> bool {
        self.p1.matches_node(tree, node) != self.p2.matches_node(tree, node)
    }

    fn matches_member(&self, tree: &AstNodeHierarchy, node: &AstNode, member: &AstNodeMember) -> bool {
        self.p1.matches_member(tree, node, member) != self.p2.matches_member(tree, node, member)
    }
}

/// NOT pattern combinator
pub struct NotPattern<P: Pattern> {
    pattern: P,
}

impl<P: Pattern> Pattern for NotPattern<P> {
    fn matches_tree(&self, tree: &AstNodeHierarchy) -> bool {
        !self.pattern.matches_tree(tree)
    }

    fn matches_node(&self, tree: &AstNodeHierarchy, node: &AstNode) -> bool {
        !self.pattern.matches_node(tree, node)
    }

    fn matches_member(&self, tree: &AstNodeHierarchy, node: &AstNode, member: &AstNodeMember) -> bool {
        !self.pattern.matches_member(tree, node, member)
    }
}

/// N-ary AND
pub struct AllPattern {
    patterns: Vec<Box<dyn Pattern>>,
}

impl Pattern for AllPattern {
    fn matches_tree(&self, tree: &AstNodeHierarchy) -> bool {
        self.patterns.iter().all(|p| p.matches_tree(tree))
    }

    fn matches_node(&self, tree: &AstNodeHierarchy, node: &AstNode) -> bool {
        self.patterns.iter().all(|p| p.matches_node(tree, node))
    }

    fn matches_member(&self, tree: &AstNodeHierarchy, node: &AstNode, member: &AstNodeMember) -> bool {
        self.patterns.iter().all(|p| p.matches_member(tree, node, member))
    }
}

/// N-ary OR
pub struct AnyPattern {
    patterns: Vec<Box<dyn Pattern>>,
}

impl Pattern for AnyPattern {
    fn matches_tree(&self, tree: &AstNodeHierarchy) -> bool {
        self.patterns.iter().any(|p| p.matches_tree(tree))
    }

    fn matches_node(&self, tree: &AstNodeHierarchy, node: &AstNode) -> bool {
        self.patterns.iter().any(|p| p.matches_node(tree, node))
    }

    fn matches_member(&self, tree: &AstNodeHierarchy, node: &AstNode, member: &AstNodeMember) -> bool {
        self.patterns.iter().any(|p| p.matches_member(tree, node, member))
    }
}
