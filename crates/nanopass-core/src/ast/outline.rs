// Plain-text outline generation from a hierarchy.
// Used by the reference output adapter and for diagnostics when a pass result
// needs to be eyeballed; nothing here is meant to be parsed back.

use super::*;

const INDENT: &str = "  ";

/// Trait for types that can render an indented outline of themselves
pub trait ToOutline {
    fn to_outline(&self) -> String;
}

fn push_documentation(out: &mut String, documentation: &Option<String>, depth: usize) {
    if let Some(doc) = documentation {
        for line in doc.lines() {
            out.push_str(&INDENT.repeat(depth));
            out.push_str("/// ");
            out.push_str(line);
            out.push('\n');
        }
    }
}

fn format_member(out: &mut String, member: &AstNodeMember, depth: usize) {
    push_documentation(out, &member.documentation, depth);
    out.push_str(&INDENT.repeat(depth));
    out.push_str("member ");
    out.push_str(&member.name);
    if let Some(type_name) = &member.type_name {
        out.push_str(&format!(": {type_name}"));
    }
    if !member.attributes.is_empty() {
        out.push_str(&format!(" {}", member.attributes));
    }
    out.push('\n');
}

fn format_node(out: &mut String, node: &AstNode, depth: usize) {
    push_documentation(out, &node.documentation, depth);
    out.push_str(&INDENT.repeat(depth));
    out.push_str("node ");
    out.push_str(&node.name);
    if !node.attributes.is_empty() {
        out.push_str(&format!(" {}", node.attributes));
    }
    out.push('\n');
    for member in node.members.values() {
        format_member(out, member, depth + 1);
    }
    for child in node.children.values() {
        format_node(out, child, depth + 1);
    }
}

impl ToOutline for AstNodeMember {
    fn to_outline(&self) -> String {
        let mut out = String::new();
        format_member(&mut out, self, 0);
        out
    }
}

impl ToOutline for AstNode {
    fn to_outline(&self) -> String {
        let mut out = String::new();
        format_node(&mut out, self, 0);
        out
    }
}

impl ToOutline for AstNodeHierarchy {
    fn to_outline(&self) -> String {
        let mut out = String::new();
        for root in self.roots() {
            format_node(&mut out, root, 0);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_outline() {
        let hierarchy = AstNodeHierarchy::new(vec![AstNode::new("Person")
            .with_documentation("A person")
            .with_attribute(AttributeValue::flag("public"))
            .with_member(AstNodeMember::new("name").with_type("string"))
            .with_child(AstNode::new("Address").with_member(AstNodeMember::new("street")))]);

        let expected = "\
/// A person
node Person [public]
  member name: string
  node Address
    member street
";
        assert_eq!(hierarchy.to_outline(), expected);
    }

    #[test]
    fn test_empty_hierarchy_outline() {
        assert_eq!(AstNodeHierarchy::empty().to_outline(), "");
    }
}
