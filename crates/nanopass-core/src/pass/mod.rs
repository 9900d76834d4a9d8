/*!
# Pass Chains

A compiler is a chain of [`CompilerPass`]es. Each pass names its successor (and
optionally its predecessor) and owns an ordered list of transformation
descriptions. [`PassSequenceBuilder`] validates the chain and produces a
[`PassSequence`], which materializes each pass's hierarchy on demand.

Every sequence starts with a synthetic sentinel pass named [`EMPTY_PASS_NAME`]
whose hierarchy is empty, so the first declared pass always has a predecessor.
*/

pub mod sequence;
pub mod sequence_builder;

use crate::transform::TransformationDescription;

pub use sequence::PassSequence;
pub use sequence_builder::{CompilerPassBuilder, PassSequenceBuilder};


/// Name of the synthetic pass heading every sequence
pub const EMPTY_PASS_NAME: &str = "$empty";

/// Placeholder meaning "no pass"; accepted in `previous`/`next` links
pub const NULL_PASS_NAME: &str = "$null";

/// Names that user passes may not take
pub fn is_reserved_pass_name(name: &str) -> bool {
    name == EMPTY_PASS_NAME || name == NULL_PASS_NAME
}

/// Errors raised while assembling or querying a pass chain
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PassError {
    #[error("Invalid root pass name '{name}'")]
    InvalidRootName { name: String },

    #[error("Pass name '{name}' is reserved")]
    ReservedPassName { name: String },

    #[error("Pass '{name}' is declared more than once")]
    DuplicatePass { name: String },

    #[error("Pass '{name}' referenced by '{referenced_by}' was not found")]
    PassNotFound { name: String, referenced_by: String },

    #[error("Circular reference: pass '{from}' links back to '{pass}'")]
    CircularReference { pass: String, from: String },

    #[error("Inconsistent lineage: pass '{pass}' declares previous pass '{declared}' but follows '{actual}'")]
    InconsistentLineage {
        pass: String,
        declared: String,
        actual: String,
    },

    #[error("Pass '{name}' is not reachable from the root pass")]
    UnreachablePass { name: String },

    #[error("Pass '{name}' is not part of this sequence")]
    NotInSequence { name: String },
}

/// One validated link of a [`PassSequence`]
#[derive(Debug, Clone)]
pub struct CompilerPass {
    name: String,
    documentation: Option<String>,
    transformations: Vec<TransformationDescription>,
    previous: Option<String>,
    next: Option<String>,
}

impl CompilerPass {
    pub(crate) fn new(
        name: String,
        documentation: Option<String>,
        transformations: Vec<TransformationDescription>,
        previous: Option<String>,
        next: Option<String>,
    ) -> Self {
        Self {
            name,
            documentation,
            transformations,
            previous,
            next,
        }
    }

    /// The sentinel heading a sequence whose first real pass is `root`
    pub(crate) fn sentinel(root: &str) -> Self {
        Self::new(
            EMPTY_PASS_NAME.to_string(),
            None,
            Vec::new(),
            None,
            Some(root.to_string()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// Applied in order when the pass is materialized
    pub fn transformations(&self) -> &[TransformationDescription] {
        &self.transformations
    }

    /// Predecessor name; `None` only for the sentinel
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Successor name; `None` for the terminal pass
    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn is_sentinel(&self) -> bool {
        self.name == EMPTY_PASS_NAME
    }
}
