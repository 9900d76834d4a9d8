use pretty_assertions::assert_eq;

use super::*;
use crate::ast::{AstNodeMember, AttributeValue};

fn path(text: &str) -> NodePath {
    NodePath::parse(text).unwrap()
}

fn sample() -> AstNodeHierarchy {
    AstNodeHierarchy::new(vec![
        AstNode::new("Person")
            .with_documentation("A person")
            .with_attribute(AttributeValue::flag("public"))
            .with_member(AstNodeMember::new("name").with_type("string"))
            .with_member(
                AstNodeMember::new("age")
                    .with_type("int")
                    .with_attribute(AttributeValue::int("order", 1)),
            )
            .with_child(
                AstNode::new("Address")
                    .with_member(AstNodeMember::new("street"))
                    .with_child(AstNode::new("Geo")),
            ),
        AstNode::new("Company"),
    ])
}

#[test]
fn test_round_trip_yields_equal_hierarchy() {
    let original = sample();
    let rebuilt = HierarchyBuilder::from_hierarchy(&original)
        .build(MissingChildBehavior::Throw)
        .unwrap();
    assert_eq!(rebuilt, original);
    assert_eq!(
        rebuilt.find(&path("Person.Address.Geo")).unwrap().path(),
        &path("Person.Address.Geo")
    );
}

#[test]
fn test_round_trip_of_empty_hierarchy() {
    let rebuilt = HierarchyBuilder::from_hierarchy(&AstNodeHierarchy::empty())
        .build(MissingChildBehavior::Throw)
        .unwrap();
    assert_eq!(rebuilt, AstNodeHierarchy::empty());
}

#[test]
fn test_missing_child_throws() {
    let mut builder = HierarchyBuilder::new();
    builder.add_root("a");
    assert!(builder.declare_child(&path("a"), "ghost"));

    let err = builder.build(MissingChildBehavior::Throw).unwrap_err();
    assert_eq!(
        err,
        BuildError::MissingChild {
            parent: path("a"),
            child: "ghost".to_string(),
        }
    );
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn test_missing_child_creates_empty_node() {
    let mut builder = HierarchyBuilder::new();
    builder.add_root("a").documentation = Some("root".to_string());
    builder.declare_child(&path("a"), "ghost");

    let hierarchy = builder.build(MissingChildBehavior::CreateEmptyNode).unwrap();
    let ghost = hierarchy.find(&path("a.ghost")).unwrap();
    assert_eq!(ghost.name, "ghost");
    assert!(ghost.is_bare());
    assert_eq!(ghost.documentation, None);
    assert_eq!(hierarchy.parent_of(ghost).unwrap().name, "a");
}

#[test]
fn test_build_node_reconstructs_from_root() {
    let builder = HierarchyBuilder::from_hierarchy(&sample());
    let address = builder
        .build_node(&path("Person.Address"), MissingChildBehavior::Throw)
        .unwrap();
    assert_eq!(address.path(), &path("Person.Address"));
    assert_eq!(address.parent_path(), Some(path("Person")));
    assert!(address.has_child("Geo"));

    let missing = builder.build_node(&path("Person.Nope"), MissingChildBehavior::Throw);
    assert_eq!(
        missing.unwrap_err(),
        BuildError::NodeNotFound {
            path: path("Person.Nope")
        }
    );
}

#[test]
fn test_mutations_are_staged_until_build() {
    let mut builder = HierarchyBuilder::from_hierarchy(&sample());

    builder.add_child(&path("Person"), "Phone").unwrap();
    builder
        .node_mut(&path("Person.Phone"))
        .unwrap()
        .add_member(MemberBuilder::new("number"));
    assert!(builder.remove_child(&path("Person"), "Address"));
    builder.node_mut(&path("Person")).unwrap().remove_member("age");

    // Stale descendants are gone from the registry as well
    assert!(!builder.contains(&path("Person.Address.Geo")));

    let hierarchy = builder.build(MissingChildBehavior::Throw).unwrap();
    let person = hierarchy.root("Person").unwrap();
    assert!(!person.has_child("Address"));
    assert!(!person.has_member("age"));
    assert!(person.child("Phone").unwrap().has_member("number"));
}

#[test]
fn test_duplicate_members_rejected_at_build() {
    let mut builder = HierarchyBuilder::new();
    let root = builder.add_root("a");
    root.add_member(MemberBuilder::new("x"));
    root.add_member(MemberBuilder::new("x"));

    assert_eq!(
        builder.build(MissingChildBehavior::Throw).unwrap_err(),
        BuildError::DuplicateMember {
            path: path("a"),
            member: "x".to_string(),
        }
    );
}

#[test]
fn test_remove_root() {
    let mut builder = HierarchyBuilder::from_hierarchy(&sample());
    assert!(builder.remove_node(&path("Company")));
    assert!(!builder.remove_node(&path("Company")));

    let hierarchy = builder.build(MissingChildBehavior::Throw).unwrap();
    assert_eq!(hierarchy.roots().len(), 1);
}

#[test]
fn test_rename_rekeys_descendants() {
    let mut builder = HierarchyBuilder::from_hierarchy(&sample());
    let renamed = builder.rename_node(&path("Person.Address"), "Location").unwrap();
    assert_eq!(renamed, path("Person.Location"));
    assert!(builder.contains(&path("Person.Location.Geo")));
    assert!(!builder.contains(&path("Person.Address")));

    let hierarchy = builder.build(MissingChildBehavior::Throw).unwrap();
    let location = hierarchy.find(&path("Person.Location")).unwrap();
    assert!(location.has_member("street"));
    assert_eq!(
        location.child("Geo").unwrap().path(),
        &path("Person.Location.Geo")
    );
}

#[test]
fn test_rename_root() {
    let mut builder = HierarchyBuilder::from_hierarchy(&sample());
    builder.rename_node(&path("Company"), "Employer").unwrap();
    assert_eq!(builder.roots(), ["Person".to_string(), "Employer".to_string()]);
    assert!(builder.rename_node(&path("Missing"), "x").is_none());
}
