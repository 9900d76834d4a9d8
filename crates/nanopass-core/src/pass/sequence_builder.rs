use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::{is_reserved_pass_name, CompilerPass, PassError, PassSequence, EMPTY_PASS_NAME, NULL_PASS_NAME};
use crate::config::NanopassConfig;
use crate::transform::TransformationDescription;

/// Staging form of a [`CompilerPass`], as produced by input adapters
#[derive(Debug, Clone)]
pub struct CompilerPassBuilder {
    pub name: String,
    pub documentation: Option<String>,
    pub transformations: Vec<TransformationDescription>,
    /// Expected predecessor; checked against the actual chain at build time
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl CompilerPassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            transformations: Vec::new(),
            previous: None,
            next: None,
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_transformation(mut self, description: TransformationDescription) -> Self {
        self.transformations.push(description);
        self
    }

    pub fn with_transformations<I>(mut self, descriptions: I) -> Self
    where
        I: IntoIterator<Item = TransformationDescription>,
    {
        self.transformations.extend(descriptions);
        self
    }

    pub fn with_previous(mut self, previous: impl Into<String>) -> Self {
        self.previous = Some(previous.into());
        self
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }
}

/// `$null` in a link is the same as no link
fn link(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|name| *name != NULL_PASS_NAME)
}

/// Collects pass declarations and links them into a validated [`PassSequence`]
#[derive(Debug, Clone, Default)]
pub struct PassSequenceBuilder {
    passes: IndexMap<String, CompilerPassBuilder>,
    root: Option<String>,
    config: NanopassConfig,
}

impl PassSequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: NanopassConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &NanopassConfig {
        &self.config
    }

    /// Name of the first real pass of the chain
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn set_root(&mut self, root: impl Into<String>) {
        self.root = Some(root.into());
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Declare a pass. Reserved and duplicate names are rejected immediately.
    pub fn add_pass(&mut self, pass: CompilerPassBuilder) -> Result<&mut CompilerPassBuilder, PassError> {
        if is_reserved_pass_name(&pass.name) {
            return Err(PassError::ReservedPassName { name: pass.name });
        }
        if self.passes.contains_key(&pass.name) {
            return Err(PassError::DuplicatePass { name: pass.name });
        }
        let name = pass.name.clone();
        Ok(self.passes.entry(name).or_insert(pass))
    }

    /// Chaining form of [`add_pass`](Self::add_pass)
    pub fn with_pass(mut self, pass: CompilerPassBuilder) -> Result<Self, PassError> {
        self.add_pass(pass)?;
        Ok(self)
    }

    pub fn pass(&self, name: &str) -> Option<&CompilerPassBuilder> {
        self.passes.get(name)
    }

    pub fn pass_mut(&mut self, name: &str) -> Option<&mut CompilerPassBuilder> {
        self.passes.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Walk the chain from the root and validate every link
    pub fn build(&self) -> Result<PassSequence, PassError> {
        let root = self.root.clone().unwrap_or_default();
        if root.is_empty() || is_reserved_pass_name(&root) {
            return Err(PassError::InvalidRootName { name: root });
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut chain: Vec<CompilerPass> = vec![CompilerPass::sentinel(&root)];
        let mut previous = EMPTY_PASS_NAME.to_string();
        let mut current = Some(root.clone());

        while let Some(name) = current {
            let pass = self.passes.get(&name).ok_or_else(|| PassError::PassNotFound {
                name: name.clone(),
                referenced_by: previous.clone(),
            })?;
            if !visited.insert(pass.name.as_str()) {
                return Err(PassError::CircularReference {
                    pass: name,
                    from: previous,
                });
            }

            if let Some(declared) = link(&pass.previous) {
                if declared != previous {
                    return Err(PassError::InconsistentLineage {
                        pass: name,
                        declared: declared.to_string(),
                        actual: previous,
                    });
                }
            }

            let next = link(&pass.next).map(str::to_string);
            debug!(pass = %name, previous = %previous, next = ?next, "linked pass");
            chain.push(CompilerPass::new(
                name.clone(),
                pass.documentation.clone(),
                pass.transformations.clone(),
                Some(previous),
                next.clone(),
            ));
            previous = name;
            current = next;
        }

        for name in self.passes.keys() {
            if !visited.contains(name.as_str()) {
                if self.config.reject_unreachable_passes {
                    return Err(PassError::UnreachablePass { name: name.clone() });
                }
                warn!(pass = %name, root = %root, "pass is not reachable from the root and will be ignored");
            }
        }

        info!(root = %root, passes = chain.len() - 1, "built pass sequence");
        Ok(PassSequence::new(chain, self.config.transformer()))
    }
}
