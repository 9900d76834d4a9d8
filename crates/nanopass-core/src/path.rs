/*!
# Node Paths

Addressing for nodes inside an [`AstNodeHierarchy`](crate::ast::AstNodeHierarchy).

A path is the ordered list of node names leading from a hierarchy root down to a
node. Paths are plain values: they never reference a node instance, so they can be
used as registry keys by builders and compared freely across passes.
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator used by the textual form of a path (`a.b.c`)
pub const PATH_SEPARATOR: char = '.';

/// Errors raised while constructing or navigating a [`NodePath`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A path needs at least one segment
    #[error("Node path cannot be empty")]
    Empty,

    /// The textual form contained an empty segment, e.g. `a..b`
    #[error("Node path '{input}' contains an empty segment")]
    EmptySegment { input: String },

    /// `parent()` was requested on a single-segment path
    #[error("Root path '{path}' has no parent")]
    NoParent { path: String },
}

/// Ordered, non-empty sequence of node names from a root to a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    /// Create a path from a sequence of names. Fails when the sequence is empty.
    pub fn new<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self { segments })
    }

    /// Single-segment path addressing a hierarchy root
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Parse the dotted textual form (`a.b.c`)
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }
        let segments: Vec<String> = input.split(PATH_SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment {
                input: input.to_string(),
            });
        }
        Ok(Self { segments })
    }

    /// Name of the addressed node
    pub fn leaf(&self) -> &str {
        // Non-empty by construction
        &self.segments[self.segments.len() - 1]
    }

    /// Name of the root the path starts from
    pub fn root_name(&self) -> &str {
        &self.segments[0]
    }

    /// Number of edges between the root and the addressed node
    pub fn depth(&self) -> usize {
        self.segments.len() - 1
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for parity with `len`
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }

    /// Path with the last segment dropped
    pub fn parent(&self) -> Result<NodePath, PathError> {
        if self.is_root() {
            return Err(PathError::NoParent {
                path: self.to_string(),
            });
        }
        Ok(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Path extended by one child name
    pub fn child(&self, name: impl Into<String>) -> NodePath {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Same path with the leaf replaced by `name`
    pub fn with_leaf(&self, name: impl Into<String>) -> NodePath {
        let mut segments = self.segments.clone();
        let last = segments.len() - 1;
        segments[last] = name.into();
        Self { segments }
    }

    /// True if `prefix` addresses this node or one of its ancestors
    pub fn starts_with(&self, prefix: &NodePath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Rebase this path from `old_prefix` onto `new_prefix`.
    ///
    /// Returns `None` if the path does not live under `old_prefix`.
    pub fn rebase(&self, old_prefix: &NodePath, new_prefix: &NodePath) -> Option<NodePath> {
        if !self.starts_with(old_prefix) {
            return None;
        }
        let mut segments = new_prefix.segments.clone();
        segments.extend_from_slice(&self.segments[old_prefix.segments.len()..]);
        Some(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{PATH_SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Vec<String>> for NodePath {
    type Error = PathError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(segments)
    }
}

impl From<NodePath> for Vec<String> {
    fn from(path: NodePath) -> Self {
        path.segments
    }
}
