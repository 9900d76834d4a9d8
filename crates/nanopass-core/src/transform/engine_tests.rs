// Tests for the per-pass rewrite engine

use pretty_assertions::assert_eq;

use super::rules::{
    AddChild, AddMember, AddRoot, DocumentMember, RemoveChild, RemoveNode, RenameNode, RetypeMember, Rewrite,
    SetDocumentation,
};
use super::*;
use crate::ast::{AstNode, AstNodeHierarchy, AstNodeMember, AttributeValue};
use crate::builder::BuildError;
use crate::path::NodePath;

fn path(text: &str) -> NodePath {
    NodePath::parse(text).unwrap()
}

fn sample() -> AstNodeHierarchy {
    AstNodeHierarchy::new(vec![
        AstNode::new("Person")
            .with_member(AstNodeMember::new("a").with_type("int"))
            .with_child(
                AstNode::new("Address")
                    .with_member(AstNodeMember::new("street"))
                    .with_child(AstNode::new("Geo").with_member(AstNodeMember::new("lat"))),
            ),
        AstNode::new("Company").with_member(AstNodeMember::new("a")),
    ])
}

#[test]
fn test_empty_transformation_list_is_identity() -> anyhow::Result<()> {
    let original = sample();
    let (result, summary) = PassTransformer::new().apply_with_summary(&original, &[])?;
    assert_eq!(result, original);
    assert!(!summary.changed());
    assert_eq!(summary.nodes_visited, 0);
    Ok(())
}

#[test]
fn test_passthrough_transformation_rebuilds_equal_tree() -> anyhow::Result<()> {
    let original = sample();
    let noop = TransformationDescription::new(Rewrite::node("noop", |_, node| Ok(Some(node))));
    let (result, summary) = PassTransformer::new().apply_with_summary(&original, &[noop])?;
    assert_eq!(result, original);
    assert_eq!(summary.nodes_visited, 4);
    assert_eq!(summary.tree_rewrites, 0);
    assert!(!summary.changed());
    Ok(())
}

#[test]
fn test_node_additions_and_member_edits_compose() -> anyhow::Result<()> {
    let add_b = TransformationDescription::new(AddMember::new(AstNodeMember::new("b")));
    let edit_a = TransformationDescription::new(Rewrite::member("edit-a", |_, _, member: AstNodeMember| {
        if member.name == "a" {
            return Ok(Some(member.with_documentation("edited")));
        }
        Ok(Some(member))
    }));

    let result = PassTransformer::new().apply(&sample(), &[add_b, edit_a])?;

    for node in result.iter() {
        assert!(node.has_member("b"), "node {} is missing member b", node.path());
    }
    let person_a = result.root("Person").unwrap().member("a").unwrap();
    assert_eq!(person_a.documentation.as_deref(), Some("edited"));
    assert_eq!(person_a.type_name.as_deref(), Some("int"));
    let company_a = result.root("Company").unwrap().member("a").unwrap();
    assert_eq!(company_a.documentation.as_deref(), Some("edited"));
    Ok(())
}

#[test]
fn test_omitted_child_is_removed_with_subtree() -> anyhow::Result<()> {
    let drop_address = TransformationDescription::new(RemoveChild::new("Address"))
        .with_pattern(PatternMatcher::node_named("Person"));

    let (result, summary) = PassTransformer::new().apply_with_summary(&sample(), &[drop_address])?;

    assert!(result.find(&path("Person.Address")).is_none());
    assert!(result.find(&path("Person.Address.Geo")).is_none());
    assert!(result.root("Person").unwrap().has_member("a"));
    assert_eq!(summary.children_removed, 1);
    assert_eq!(result.node_count(), 2);
    Ok(())
}

#[test]
fn test_removed_node_is_not_visited() -> anyhow::Result<()> {
    let remove = TransformationDescription::new(RemoveNode).with_pattern(PatternMatcher::node_named("Address"));
    let fail_below = TransformationDescription::new(Rewrite::node("guard", |_, node: AstNode| {
        anyhow::ensure!(node.name != "Geo", "descended into a removed subtree");
        Ok(Some(node))
    }));

    let (result, summary) = PassTransformer::new().apply_with_summary(&sample(), &[remove, fail_below])?;
    assert!(!result.contains(&path("Person.Address")));
    assert_eq!(summary.nodes_removed, 1);
    Ok(())
}

#[test]
fn test_removing_a_root() -> anyhow::Result<()> {
    let remove = TransformationDescription::new(RemoveNode).with_pattern(PatternMatcher::node_named("Company"));
    let result = PassTransformer::new().apply(&sample(), &[remove])?;
    assert_eq!(result.roots().len(), 1);
    assert_eq!(result.roots()[0].name, "Person");
    Ok(())
}

#[test]
fn test_added_child_is_fully_materialized() -> anyhow::Result<()> {
    let phone = AstNode::new("Phone")
        .with_attribute(AttributeValue::flag("value-object"))
        .with_member(AstNodeMember::new("number").with_type("string"))
        .with_child(AstNode::new("Extension").with_member(AstNodeMember::new("digits")));
    let add = TransformationDescription::new(AddChild::new(phone)).with_pattern(PatternMatcher::root());

    let result = PassTransformer::new().apply(&sample(), &[add])?;

    for root in ["Person", "Company"] {
        let phone = result.find(&NodePath::root(root).child("Phone")).unwrap();
        assert!(phone.attributes.contains_key("value-object"));
        assert_eq!(phone.member("number").unwrap().type_name.as_deref(), Some("string"));
        let extension = phone.child("Extension").unwrap();
        assert!(extension.has_member("digits"));
        assert_eq!(extension.path(), &NodePath::root(root).child("Phone").child("Extension"));
    }
    Ok(())
}

#[test]
fn test_guards_see_node_as_it_entered_the_pass() -> anyhow::Result<()> {
    let tree = AstNodeHierarchy::new(vec![AstNode::new("Old")]);
    let rename = TransformationDescription::new(RenameNode::new("New"));
    let tag = TransformationDescription::new(SetDocumentation::new(Some("tagged".to_string())))
        .with_pattern(PatternMatcher::node_named("Old"));

    let result = PassTransformer::new().apply(&tree, &[rename, tag])?;
    assert!(result.root("Old").is_none());
    assert_eq!(result.root("New").unwrap().documentation.as_deref(), Some("tagged"));
    Ok(())
}

#[test]
fn test_guards_ignore_members_added_earlier_in_the_pass() -> anyhow::Result<()> {
    let add = TransformationDescription::new(AddMember::new(AstNodeMember::new("id")));
    let tag = TransformationDescription::new(super::rules::AddAttribute::new(
        AttributeValue::flag("identified"),
        super::rules::AttributeTarget::Node,
    ))
    .with_pattern(PatternMatcher::has_member("id"));

    let result = PassTransformer::new().apply(&sample(), &[add, tag])?;
    assert!(result.iter().all(|node| node.has_member("id")));
    assert!(result.iter().all(|node| !node.attributes.contains_key("identified")));
    Ok(())
}

#[test]
fn test_member_guard_sees_member_before_rewrite() -> anyhow::Result<()> {
    let tree = AstNodeHierarchy::new(vec![AstNode::new("Person").with_member(AstNodeMember::new("a").with_type("int"))]);
    let retype = TransformationDescription::new(RetypeMember::new("a", Some("long".to_string())));
    let document = TransformationDescription::new(DocumentMember::new("a", Some("was int".to_string())))
        .with_pattern(PatternMatcher::member_typed("int"));

    let result = PassTransformer::new().apply(&tree, &[retype, document])?;
    let a = result.root("Person").unwrap().member("a").unwrap();
    assert_eq!(a.type_name.as_deref(), Some("long"));
    assert_eq!(a.documentation.as_deref(), Some("was int"));
    Ok(())
}

fn two_members() -> AstNodeHierarchy {
    AstNodeHierarchy::new(vec![AstNode::new("Node")
        .with_member(AstNodeMember::new("a").with_type("int"))
        .with_member(AstNodeMember::new("b").with_type("str"))])
}

fn member_types(tree: &AstNodeHierarchy) -> Vec<(String, Option<String>)> {
    tree.root("Node")
        .unwrap()
        .members
        .values()
        .map(|member| (member.name.clone(), member.type_name.clone()))
        .collect()
}

#[test]
fn test_member_renames_shift_without_aliasing() -> anyhow::Result<()> {
    let shift = TransformationDescription::new(Rewrite::member("shift", |_, _, member: AstNodeMember| {
        let renamed = match member.name.as_str() {
            "a" => member.with_name("b"),
            "b" => member.with_name("c"),
            _ => member,
        };
        Ok(Some(renamed))
    }));

    let (result, summary) = PassTransformer::new().apply_with_summary(&two_members(), &[shift])?;
    assert_eq!(
        member_types(&result),
        vec![
            ("b".to_string(), Some("int".to_string())),
            ("c".to_string(), Some("str".to_string())),
        ]
    );
    assert_eq!(summary.members_rewritten, 2);
    Ok(())
}

#[test]
fn test_member_rename_and_removal_target_original_members() -> anyhow::Result<()> {
    let replace = TransformationDescription::new(Rewrite::member("replace", |_, _, member: AstNodeMember| {
        match member.name.as_str() {
            "a" => Ok(Some(member.with_name("b"))),
            "b" => Ok(None),
            _ => Ok(Some(member)),
        }
    }));

    let (result, summary) = PassTransformer::new().apply_with_summary(&two_members(), &[replace])?;
    assert_eq!(member_types(&result), vec![("b".to_string(), Some("int".to_string()))]);
    assert_eq!(summary.members_removed, 1);
    Ok(())
}

#[test]
fn test_sibling_names_can_be_swapped() -> anyhow::Result<()> {
    let tree = AstNodeHierarchy::new(vec![
        AstNode::new("A").with_member(AstNodeMember::new("fromA")),
        AstNode::new("B").with_member(AstNodeMember::new("fromB")),
    ]);
    let swap = TransformationDescription::new(Rewrite::node("swap", |_, mut node: AstNode| {
        node.name = if node.name == "A" { "B".to_string() } else { "A".to_string() };
        Ok(Some(node))
    }));

    let (result, summary) = PassTransformer::new().apply_with_summary(&tree, &[swap])?;
    assert_eq!(result.roots().len(), 2);
    assert!(result.root("B").unwrap().has_member("fromA"));
    assert!(result.root("A").unwrap().has_member("fromB"));
    assert_eq!(summary.nodes_renamed, 2);
    Ok(())
}

#[test]
fn test_rename_onto_existing_sibling_is_rejected() {
    let rename = TransformationDescription::new(RenameNode::new("Company"))
        .with_pattern(PatternMatcher::node_named("Person"));

    let err = PassTransformer::new().apply(&sample(), &[rename]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<BuildError>(),
        Some(&BuildError::DuplicateNode {
            path: NodePath::root("Company"),
        })
    );
}

#[test]
fn test_rename_onto_removed_sibling_is_allowed() -> anyhow::Result<()> {
    let remove = TransformationDescription::new(RemoveNode).with_pattern(PatternMatcher::node_named("Company"));
    let rename = TransformationDescription::new(RenameNode::new("Company"))
        .with_pattern(PatternMatcher::node_named("Person"));

    let result = PassTransformer::new().apply(&sample(), &[remove, rename])?;
    assert_eq!(result.roots().len(), 1);
    let company = result.root("Company").unwrap();
    assert_eq!(company.member("a").unwrap().type_name.as_deref(), Some("int"));
    assert!(result.contains(&path("Company.Address.Geo")));
    Ok(())
}

#[test]
fn test_patterns_see_tree_after_tree_level_fold() -> anyhow::Result<()> {
    let add_root = TransformationDescription::new(AddRoot::new(AstNode::new("Config")));
    let mark = TransformationDescription::new(AddMember::new(AstNodeMember::new("configured")))
        .with_pattern(PatternMatcher::tree_contains(NodePath::root("Config")));

    let result = PassTransformer::new().apply(&sample(), &[add_root, mark])?;
    assert_eq!(result.roots().len(), 3);
    assert!(result.iter().all(|node| node.has_member("configured")));
    Ok(())
}

#[test]
fn test_rename_node_keeps_subtree() -> anyhow::Result<()> {
    let rename = TransformationDescription::new(RenameNode::new("Location"))
        .with_pattern(PatternMatcher::node_named("Address"));

    let (result, summary) = PassTransformer::new().apply_with_summary(&sample(), &[rename])?;
    let location = result.find(&path("Person.Location")).unwrap();
    assert!(location.has_member("street"));
    assert!(location.child("Geo").unwrap().has_member("lat"));
    assert!(!result.contains(&path("Person.Address")));
    assert_eq!(summary.nodes_renamed, 1);
    Ok(())
}

#[test]
fn test_transformation_errors_propagate() {
    let failing = TransformationDescription::new(Rewrite::node("boom", |_, _| anyhow::bail!("rule failed")));
    let err = PassTransformer::new().apply(&sample(), &[failing]).unwrap_err();
    assert!(err.to_string().contains("rule failed"));
}

#[test]
fn test_duplicate_member_from_rename_fails_build() {
    let clash = TransformationDescription::new(super::rules::RenameMember::new("street", "a"))
        .with_pattern(PatternMatcher::node_named("Address"));
    let add_a = TransformationDescription::new(AddMember::new(AstNodeMember::new("a")))
        .with_pattern(PatternMatcher::node_named("Address"));

    let err = PassTransformer::new().apply(&sample(), &[add_a, clash]).unwrap_err();
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn test_input_hierarchy_is_not_modified() -> anyhow::Result<()> {
    let original = sample();
    let snapshot = original.clone();
    let remove = TransformationDescription::new(RemoveNode).with_pattern(PatternMatcher::depth(1));
    let result = PassTransformer::new().apply(&original, &[remove])?;
    assert_eq!(original, snapshot);
    assert_ne!(result, original);
    Ok(())
}
