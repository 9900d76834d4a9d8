// Adapter contracts - pluggable front ends and back ends around the engine
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::ast::{AstNodeHierarchy, ToOutline};
use crate::pass::PassSequence;

/// Free-form key/value arguments handed to an adapter
pub type AdapterArgs = HashMap<String, String>;

/// Turns an external pass definition into a validated [`PassSequence`]
pub trait InputAdapter: Send + Sync {
    /// Adapter name used for registry lookups
    fn name(&self) -> &str;

    /// Read pass definitions from `input`
    fn read(&self, input: &str, args: &AdapterArgs) -> Result<PassSequence>;
}

/// Renders a materialized hierarchy
pub trait OutputAdapter: Send + Sync {
    /// Adapter name used for registry lookups
    fn name(&self) -> &str;

    /// Render `hierarchy`. Adapters that produce files place them under
    /// `output_dir`; the returned string is a report or the rendered text itself.
    fn render(&self, hierarchy: &AstNodeHierarchy, output_dir: &Path, args: &AdapterArgs) -> Result<String>;
}

/// Adapter lookup failures
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Unknown {kind} adapter '{name}'")]
    UnknownAdapter { kind: AdapterKind, name: String },
}

/// Which side of the engine an adapter sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    Input,
    Output,
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterKind::Input => write!(f, "input"),
            AdapterKind::Output => write!(f, "output"),
        }
    }
}

/// Name-keyed registry of input and output adapters
#[derive(Default, Clone)]
pub struct AdapterRegistry {
    inputs: HashMap<String, Arc<dyn InputAdapter>>,
    outputs: HashMap<String, Arc<dyn OutputAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in [`OutlineRenderer`]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_output(OutlineRenderer);
        registry
    }

    /// Register an input adapter, replacing any adapter with the same name
    pub fn register_input<A: InputAdapter + 'static>(&mut self, adapter: A) {
        debug!(adapter = adapter.name(), "registered input adapter");
        self.inputs.insert(adapter.name().to_string(), Arc::new(adapter));
    }

    /// Register an output adapter, replacing any adapter with the same name
    pub fn register_output<A: OutputAdapter + 'static>(&mut self, adapter: A) {
        debug!(adapter = adapter.name(), "registered output adapter");
        self.outputs.insert(adapter.name().to_string(), Arc::new(adapter));
    }

    pub fn input(&self, name: &str) -> std::result::Result<Arc<dyn InputAdapter>, AdapterError> {
        self.inputs.get(name).cloned().ok_or_else(|| AdapterError::UnknownAdapter {
            kind: AdapterKind::Input,
            name: name.to_string(),
        })
    }

    pub fn output(&self, name: &str) -> std::result::Result<Arc<dyn OutputAdapter>, AdapterError> {
        self.outputs.get(name).cloned().ok_or_else(|| AdapterError::UnknownAdapter {
            kind: AdapterKind::Output,
            name: name.to_string(),
        })
    }

    /// Registered input adapter names, sorted
    pub fn input_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inputs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered output adapter names, sorted
    pub fn output_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.outputs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Read a sequence with the named input adapter
    pub fn read(&self, adapter: &str, input: &str, args: &AdapterArgs) -> Result<PassSequence> {
        self.input(adapter)?.read(input, args)
    }

    /// Render a hierarchy with the named output adapter
    pub fn render(
        &self,
        adapter: &str,
        hierarchy: &AstNodeHierarchy,
        output_dir: &Path,
        args: &AdapterArgs,
    ) -> Result<String> {
        self.output(adapter)?.render(hierarchy, output_dir, args)
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("inputs", &self.input_names())
            .field("outputs", &self.output_names())
            .finish()
    }
}

/// Plain-text outline of a hierarchy. Writes nothing to `output_dir`.
///
/// Accepts a `root` argument to render a single root.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineRenderer;

impl OutlineRenderer {
    pub const NAME: &'static str = "outline";
}

impl OutputAdapter for OutlineRenderer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn render(&self, hierarchy: &AstNodeHierarchy, _output_dir: &Path, args: &AdapterArgs) -> Result<String> {
        match args.get("root") {
            Some(root) => {
                let node = hierarchy
                    .root(root)
                    .ok_or_else(|| anyhow::anyhow!("Root '{}' not found in hierarchy", root))?;
                Ok(node.to_outline())
            }
            None => Ok(hierarchy.to_outline()),
        }
    }
}
