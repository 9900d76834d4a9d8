use crate::ast::{AstNode, AstNodeMember, AttributeSet};

/// Mutable staging copy of an [`AstNodeMember`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBuilder {
    pub name: String,
    pub documentation: Option<String>,
    pub type_name: Option<String>,
    pub attributes: AttributeSet,
}

impl MemberBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            type_name: None,
            attributes: AttributeSet::new(),
        }
    }

    pub fn from_member(member: &AstNodeMember) -> Self {
        Self {
            name: member.name.clone(),
            documentation: member.documentation.clone(),
            type_name: member.type_name.clone(),
            attributes: member.attributes.clone(),
        }
    }

    /// Overwrite every field with the values of `member`
    pub fn update_from(&mut self, member: AstNodeMember) {
        self.name = member.name;
        self.documentation = member.documentation;
        self.type_name = member.type_name;
        self.attributes = member.attributes;
    }

    pub fn build(&self) -> AstNodeMember {
        AstNodeMember {
            name: self.name.clone(),
            documentation: self.documentation.clone(),
            type_name: self.type_name.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

/// Mutable staging copy of a single [`AstNode`].
///
/// Holds only the node's own data plus the *names* of its children; the child
/// builders live in the owning [`HierarchyBuilder`](super::HierarchyBuilder)
/// registry under their own paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeBuilder {
    name: String,
    pub documentation: Option<String>,
    pub attributes: AttributeSet,
    children: Vec<String>,
    members: Vec<MemberBuilder>,
}

impl NodeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            attributes: AttributeSet::new(),
            children: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Shallow copy: documentation, attributes, child names and members
    pub fn from_node(node: &AstNode) -> Self {
        Self {
            name: node.name.clone(),
            documentation: node.documentation.clone(),
            attributes: node.attributes.clone(),
            children: node.children.keys().cloned().collect(),
            members: node.members.values().map(MemberBuilder::from_member).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|child| child == name)
    }

    /// Record a child name; returns false if it was already listed
    pub(crate) fn add_child_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.has_child(&name) {
            return false;
        }
        self.children.push(name);
        true
    }

    pub(crate) fn remove_child_name(&mut self, name: &str) -> bool {
        let before = self.children.len();
        self.children.retain(|child| child != name);
        before != self.children.len()
    }

    pub(crate) fn rename_child(&mut self, old: &str, new: &str) {
        if let Some(slot) = self.children.iter_mut().find(|child| child.as_str() == old) {
            *slot = new.to_string();
        }
    }

    pub fn members(&self) -> &[MemberBuilder] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&MemberBuilder> {
        self.members.iter().find(|member| member.name == name)
    }

    pub fn member_mut(&mut self, name: &str) -> Option<&mut MemberBuilder> {
        self.members.iter_mut().find(|member| member.name == name)
    }

    /// Stage a member. Name clashes are reported by `HierarchyBuilder::build`.
    pub fn add_member(&mut self, member: MemberBuilder) -> &mut MemberBuilder {
        self.members.push(member);
        let last = self.members.len() - 1;
        &mut self.members[last]
    }

    /// Remove the first staged member called `name`
    pub fn remove_member(&mut self, name: &str) -> Option<MemberBuilder> {
        let index = self.members.iter().position(|member| member.name == name)?;
        Some(self.members.remove(index))
    }
}
