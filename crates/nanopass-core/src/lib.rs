//! # Nanopass Core
//!
//! Engine for compilers built as a chain of small passes, including:
//! - Immutable AST hierarchies addressed by dotted node paths
//! - Staged builders that validate a hierarchy when it is built
//! - Pattern-guarded transformations at tree, node and member granularity
//! - Pass chains with lineage validation and memoized results
//! - Adapter contracts for reading pass definitions and rendering results
//!
//! Front ends (definition languages, template renderers, CLIs) plug in through
//! the [`adapter`] traits; this crate never touches the filesystem itself.

#![warn(clippy::all)]

pub mod adapter;
pub mod ast;
pub mod builder;
pub mod config;
pub mod pass;
pub mod path;
pub mod transform;

// Re-export commonly used types
pub use adapter::{AdapterArgs, AdapterError, AdapterKind, AdapterRegistry, InputAdapter, OutlineRenderer, OutputAdapter};
pub use ast::{AstNode, AstNodeHierarchy, AstNodeMember, AttributeSet, AttributeValue, ToOutline};
pub use builder::{BuildError, HierarchyBuilder, MemberBuilder, MissingChildBehavior, NodeBuilder};
pub use config::NanopassConfig;
pub use pass::{CompilerPass, CompilerPassBuilder, PassError, PassSequence, PassSequenceBuilder};
pub use path::{NodePath, PathError};
pub use transform::{
    PassTransformer, Pattern, PatternExt, PatternMatcher, TransformResult, Transformation,
    TransformationDescription, TransformationSummary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for nanopass components
pub fn init_tracing() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "nanopass_core=info".parse() {
        filter = filter.add_directive(directive);
    }
    // A subscriber installed by the host application wins
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Error types for nanopass operations
#[derive(thiserror::Error, Debug)]
pub enum NanopassError {
    /// Malformed node path
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// Hierarchy failed validation while building
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Pass chain error
    #[error("Pass error: {0}")]
    Pass(#[from] PassError),

    /// Adapter lookup error
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    /// A transformation failed
    #[error("Transformation error: {0}")]
    Transform(#[from] anyhow::Error),
}

/// Result type for nanopass operations
pub type Result<T> = std::result::Result<T, NanopassError>;
