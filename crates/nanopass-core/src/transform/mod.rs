/*!
# Transformation Engine

Pattern-guarded rewrite rules and the engine that applies them to a hierarchy.

## Architecture

- [`Pattern`]: guard evaluated at tree, node or member granularity
- [`Transformation`]: rewrite at tree, node or member granularity
- [`TransformationDescription`]: an optional pattern paired with a transformation
- [`PassTransformer`]: applies one pass worth of descriptions in a single traversal
- [`rules`]: built-in transformations and closure-backed extension points

## Example Usage

```rust
use nanopass_core::ast::{AstNode, AstNodeHierarchy, AstNodeMember};
use nanopass_core::transform::{PassTransformer, PatternMatcher, TransformationDescription};
use nanopass_core::transform::rules::{AddMember, RemoveMember};

let tree = AstNodeHierarchy::new(vec![
    AstNode::new("Person").with_member(AstNodeMember::new("legacy_id")),
]);

let pass = vec![
    TransformationDescription::new(AddMember::new(AstNodeMember::new("id").with_type("uuid")))
        .with_pattern(PatternMatcher::node_named("Person")),
    TransformationDescription::new(RemoveMember::new("legacy_id")),
];

let result = PassTransformer::new().apply(&tree, &pass)?;
let person = result.root("Person").unwrap();
assert!(person.has_member("id"));
assert!(!person.has_member("legacy_id"));
# Ok::<(), anyhow::Error>(())
```
*/

pub mod engine;
pub mod pattern;
pub mod rules;
pub mod transformation;

pub use engine::{PassTransformer, TransformationSummary};
pub use pattern::{Pattern, PatternExt, PatternMatcher};
pub use transformation::{Transformation, TransformationDescription};

/// Result type for rewrite operations; rule errors propagate out of the pass
pub type TransformResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod engine_tests;
