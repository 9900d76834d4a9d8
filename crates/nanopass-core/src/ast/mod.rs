// Immutable AST value model shared by every pass.
// Hierarchies hold nodes, nodes hold children and members, and both carry a set
// of opaque attributes. Nothing in here is mutated in place by the engine: each
// pass builds fresh values through `crate::builder`.

pub mod attributes;
pub mod hierarchy;
pub mod member;
pub mod node;
pub mod outline;

pub use attributes::{AttributeSet, AttributeValue};
pub use hierarchy::AstNodeHierarchy;
pub use member::AstNodeMember;
pub use node::AstNode;
pub use outline::ToOutline;
