use serde::{Deserialize, Serialize};

use super::{AttributeSet, AttributeValue};

/// A named member of an [`AstNode`](super::AstNode): a field, property or method
/// slot in whatever target language the hierarchy describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AstNodeMember {
    /// Unique within the owning node
    pub name: String,
    pub documentation: Option<String>,
    /// Absent for untyped or dynamic targets
    pub type_name: Option<String>,
    #[serde(default)]
    pub attributes: AttributeSet,
}

impl AstNodeMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            type_name: None,
            attributes: AttributeSet::new(),
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeValue) -> Self {
        self.attributes.insert(attribute);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
