use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info_span};

use super::{CompilerPass, PassError};
use crate::ast::AstNodeHierarchy;
use crate::transform::{PassTransformer, TransformationSummary};
use crate::Result;

/// A materialized pass result
#[derive(Debug, Clone)]
struct Materialized {
    tree: Arc<AstNodeHierarchy>,
    summary: TransformationSummary,
}

/// A validated chain of passes, headed by the sentinel pass.
///
/// Hierarchies are computed lazily: asking for a pass's tree materializes every
/// not-yet-computed predecessor first, and each result is memoized for the
/// lifetime of the sequence. The memo table is guarded by a single lock held for
/// the whole compute-if-absent step, so every pass is computed at most once even
/// under concurrent requests. Transformations must therefore not query the
/// sequence they run in.
pub struct PassSequence {
    passes: Vec<CompilerPass>,
    index: HashMap<String, usize>,
    transformer: PassTransformer,
    cache: Mutex<HashMap<usize, Materialized>>,
}

impl PassSequence {
    pub(crate) fn new(passes: Vec<CompilerPass>, transformer: PassTransformer) -> Self {
        let index = passes
            .iter()
            .enumerate()
            .map(|(i, pass)| (pass.name().to_string(), i))
            .collect();

        let mut cache = HashMap::new();
        cache.insert(
            0,
            Materialized {
                tree: Arc::new(AstNodeHierarchy::empty()),
                summary: TransformationSummary::new(),
            },
        );

        Self {
            passes,
            index,
            transformer,
            cache: Mutex::new(cache),
        }
    }

    /// All passes in chain order, sentinel first
    pub fn passes(&self) -> &[CompilerPass] {
        &self.passes
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompilerPass> {
        self.passes.iter()
    }

    /// Number of passes including the sentinel
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Always false: the sentinel is always present
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CompilerPass> {
        self.index.get(name).map(|&i| &self.passes[i])
    }

    pub fn sentinel(&self) -> &CompilerPass {
        &self.passes[0]
    }

    /// First declared pass
    pub fn root(&self) -> &CompilerPass {
        &self.passes[1]
    }

    /// Terminal pass
    pub fn last(&self) -> &CompilerPass {
        &self.passes[self.passes.len() - 1]
    }

    pub fn previous_of(&self, pass: &CompilerPass) -> Option<&CompilerPass> {
        pass.previous().and_then(|name| self.get(name))
    }

    pub fn next_of(&self, pass: &CompilerPass) -> Option<&CompilerPass> {
        pass.next().and_then(|name| self.get(name))
    }

    pub fn transformer(&self) -> &PassTransformer {
        &self.transformer
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.index.get(name).copied().ok_or_else(|| {
            PassError::NotInSequence {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Hierarchy produced by `pass`, computed on first access
    pub fn get_tree(&self, pass: &CompilerPass) -> Result<Arc<AstNodeHierarchy>> {
        self.get_tree_by_name(pass.name())
    }

    pub fn get_tree_by_name(&self, name: &str) -> Result<Arc<AstNodeHierarchy>> {
        let position = self.position(name)?;
        Ok(self.materialize(position)?.tree)
    }

    /// Hierarchy produced by the terminal pass
    pub fn final_tree(&self) -> Result<Arc<AstNodeHierarchy>> {
        Ok(self.materialize(self.passes.len() - 1)?.tree)
    }

    /// What the pass changed relative to its predecessor, computing it if needed
    pub fn summary(&self, name: &str) -> Result<TransformationSummary> {
        let position = self.position(name)?;
        Ok(self.materialize(position)?.summary)
    }

    /// True once the pass's hierarchy has been computed
    pub fn is_cached(&self, name: &str) -> bool {
        match self.index.get(name) {
            Some(position) => self.cache.lock().contains_key(position),
            None => false,
        }
    }

    fn materialize(&self, position: usize) -> Result<Materialized> {
        let mut cache = self.cache.lock();
        if let Some(done) = cache.get(&position) {
            return Ok(done.clone());
        }

        // Start from the closest materialized predecessor; the sentinel always is
        let mut start = position;
        while !cache.contains_key(&start) {
            start -= 1;
        }
        let mut tree = cache[&start].tree.clone();

        for i in start + 1..=position {
            let pass = &self.passes[i];
            let _span = info_span!("materialize_pass", pass = %pass.name()).entered();
            let (next, summary) = self
                .transformer
                .apply_with_summary(&tree, pass.transformations())?;
            debug!(
                pass = %pass.name(),
                nodes = next.node_count(),
                changed = summary.changed(),
                "materialized pass"
            );
            tree = Arc::new(next);
            cache.insert(
                i,
                Materialized {
                    tree: tree.clone(),
                    summary,
                },
            );
        }

        Ok(cache[&position].clone())
    }
}

impl fmt::Debug for PassSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassSequence")
            .field("passes", &self.passes.iter().map(CompilerPass::name).collect::<Vec<_>>())
            .field("cached", &self.cache.lock().len())
            .finish()
    }
}

