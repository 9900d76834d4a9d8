/*!
# Pass Pipeline Integration Tests

End-to-end tests driving hierarchies through linked passes.
*/

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nanopass_core::transform::rules::{
    AddAttribute, AddChild, AddMember, AddRoot, AttributeTarget, CompositeTransformation, RemoveMember,
    RenameMember, RetypeMember, Rewrite,
};
use nanopass_core::{
    AdapterArgs, AdapterRegistry, AstNode, AstNodeHierarchy, AstNodeMember, AttributeSet, AttributeValue,
    BuildError, CompilerPassBuilder, HierarchyBuilder, MissingChildBehavior, NanopassConfig, NodePath,
    OutlineRenderer, PassSequenceBuilder, PassTransformer, PatternExt, PatternMatcher, ToOutline,
    TransformationDescription,
};
use pretty_assertions::assert_eq;

fn model() -> AstNode {
    AstNode::new("Person")
        .with_documentation("Someone we know")
        .with_member(AstNodeMember::new("name").with_type("str"))
        .with_member(AstNodeMember::new("legacy_id").with_type("int"))
        .with_child(AstNode::new("Address").with_member(AstNodeMember::new("street").with_type("str")))
}

/// Three passes: seed the model, normalize types, then tag and clean up
fn pipeline() -> anyhow::Result<PassSequenceBuilder> {
    let seed = CompilerPassBuilder::new("seed")
        .with_documentation("Introduce the source model")
        .with_transformation(TransformationDescription::new(AddRoot::new(model())))
        .with_next("normalize");

    let normalize = CompilerPassBuilder::new("normalize")
        .with_previous("seed")
        .with_transformation(
            TransformationDescription::new(Rewrite::member("str-to-string", |_, _, member: AstNodeMember| {
                if member.type_name.as_deref() == Some("str") {
                    return Ok(Some(member.with_type("string")));
                }
                Ok(Some(member))
            }))
            .named("normalize-strings"),
        )
        .with_transformation(TransformationDescription::new(RenameMember::new("name", "full_name")))
        .with_next("finish");

    let finish = CompilerPassBuilder::new("finish")
        .with_previous("normalize")
        .with_transformation(
            TransformationDescription::new(
                CompositeTransformation::new("identify")
                    .add_rule(RemoveMember::new("legacy_id"))
                    .add_rule(AddMember::new(AstNodeMember::new("id").with_type("uuid"))),
            )
            .with_pattern(PatternMatcher::root()),
        )
        .with_transformation(
            TransformationDescription::new(AddAttribute::new(
                AttributeValue::flag("nested"),
                AttributeTarget::Node,
            ))
            .with_pattern(PatternMatcher::root().negate()),
        );

    let mut builder = PassSequenceBuilder::new().with_root("seed");
    builder.add_pass(seed)?;
    builder.add_pass(normalize)?;
    builder.add_pass(finish)?;
    Ok(builder)
}

#[test]
fn test_pipeline_end_to_end() -> anyhow::Result<()> {
    let sequence = pipeline()?.build()?;
    assert_eq!(sequence.len(), 4);

    let seeded = sequence.get_tree_by_name("seed")?;
    assert_eq!(seeded.roots(), &[model()]);

    let normalized = sequence.get_tree_by_name("normalize")?;
    let person = normalized.root("Person").unwrap();
    assert_eq!(person.member("full_name").unwrap().type_name.as_deref(), Some("string"));
    assert!(!person.has_member("name"));
    let street = normalized.find(&NodePath::parse("Person.Address")?).unwrap().member("street").unwrap();
    assert_eq!(street.type_name.as_deref(), Some("string"));

    let finished = sequence.final_tree()?;
    let person = finished.root("Person").unwrap();
    assert!(person.has_member("id"));
    assert!(!person.has_member("legacy_id"));
    assert!(!person.attributes.contains_key("nested"));
    let address = person.child("Address").unwrap();
    assert!(address.attributes.contains_key("nested"));
    assert!(!address.has_member("id"));

    // Earlier results stay untouched
    assert!(sequence.get_tree_by_name("seed")?.root("Person").unwrap().has_member("legacy_id"));
    Ok(())
}

#[test]
fn test_pipeline_renders_through_registry() -> anyhow::Result<()> {
    let sequence = pipeline()?.build()?;
    let registry = AdapterRegistry::with_builtins();
    let tree = sequence.final_tree()?;
    let rendered = registry.render(
        OutlineRenderer::NAME,
        &tree,
        Path::new("target"),
        &AdapterArgs::new(),
    )?;

    let expected = "\
/// Someone we know
node Person
  member full_name: string
  member id: uuid
  node Address [nested]
    member street: string
";
    assert_eq!(rendered, expected);
    Ok(())
}

#[test]
fn test_parent_lookup_after_rebuild() -> anyhow::Result<()> {
    let sequence = pipeline()?.build()?;
    let tree = sequence.final_tree()?;
    let address = tree.find(&NodePath::parse("Person.Address")?).unwrap();
    assert_eq!(address.parent_path(), Some(NodePath::root("Person")));
    assert_eq!(tree.parent_of(address).unwrap().name, "Person");
    assert!(tree.parent_of(tree.root("Person").unwrap()).is_none());
    Ok(())
}

#[test]
fn test_memoized_pass_is_shared() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let counting = TransformationDescription::new(Rewrite::node("count", move |_, node| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Some(node))
    }));

    let mut builder = pipeline()?;
    builder.pass_mut("normalize").unwrap().transformations.push(counting);
    let sequence = builder.build()?;

    let first = sequence.final_tree()?;
    let second = sequence.final_tree()?;
    sequence.get_tree_by_name("normalize")?;

    // Person and Address, visited once
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn test_patterns_combine_across_granularities() -> anyhow::Result<()> {
    let tree = AstNodeHierarchy::new(vec![model(), AstNode::new("Company").with_member(AstNodeMember::new("name"))]);
    let guard = PatternMatcher::member_typed("str").and(PatternMatcher::under(NodePath::root("Person")));
    let retype = TransformationDescription::new(RetypeMember::new("name", Some("text".to_string()))).with_pattern(guard);

    let result = PassTransformer::new().apply(&tree, &[retype])?;
    assert_eq!(
        result.root("Person").unwrap().member("name").unwrap().type_name.as_deref(),
        Some("text")
    );
    assert_eq!(result.root("Company").unwrap().member("name").unwrap().type_name, None);
    Ok(())
}

#[test]
fn test_missing_child_policy_from_config() -> anyhow::Result<()> {
    let declare_phone = TransformationDescription::new(Rewrite::tree("declare", |tree| {
        let mut builder = HierarchyBuilder::from_hierarchy(&tree);
        builder.declare_child(&NodePath::root("Person"), "Phone");
        Ok(builder.build(MissingChildBehavior::CreateEmptyNode)?)
    }));
    let tree = AstNodeHierarchy::new(vec![model()]);
    let result = NanopassConfig::default().transformer().apply(&tree, &[declare_phone])?;
    let phone = result.find(&NodePath::parse("Person.Phone")?).unwrap();
    assert!(phone.is_bare());

    let mut strict = HierarchyBuilder::from_hierarchy(&tree);
    strict.declare_child(&NodePath::root("Person"), "Phone");
    let err = strict.build(MissingChildBehavior::Throw).unwrap_err();
    assert!(matches!(err, BuildError::MissingChild { .. }));
    Ok(())
}

#[test]
fn test_added_child_keeps_declaration_order() -> anyhow::Result<()> {
    let tree = AstNodeHierarchy::new(vec![model()]);
    let add = TransformationDescription::new(AddChild::new(AstNode::new("Contact"))).with_pattern(PatternMatcher::root());
    let result = PassTransformer::new().apply(&tree, &[add])?;
    let children: Vec<&str> = result.root("Person").unwrap().child_names().collect();
    assert_eq!(children, vec!["Address", "Contact"]);
    Ok(())
}

#[test]
fn test_attribute_set_equality_ignores_order() {
    let forward: AttributeSet = [AttributeValue::flag("a"), AttributeValue::int("size", 3)].into_iter().collect();
    let backward: AttributeSet = [
        AttributeValue::int("size", 3),
        AttributeValue::flag("a"),
        AttributeValue::flag("a"),
    ]
    .into_iter()
    .collect();
    assert_eq!(forward, backward);
}

#[test]
fn test_hierarchy_serde_round_trip_restores_paths() -> anyhow::Result<()> {
    let tree = AstNodeHierarchy::new(vec![model()]);
    let json = serde_json::to_string(&tree)?;
    let decoded: AstNodeHierarchy = serde_json::from_str(&json)?;
    assert_eq!(decoded, tree);
    let street_owner = decoded.find(&NodePath::parse("Person.Address")?).unwrap();
    assert_eq!(street_owner.path().to_string(), "Person.Address");
    assert_eq!(decoded.to_outline(), tree.to_outline());
    Ok(())
}
