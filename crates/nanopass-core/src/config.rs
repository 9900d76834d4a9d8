use serde::{Deserialize, Serialize};

use crate::builder::MissingChildBehavior;
use crate::transform::PassTransformer;

/// Engine configuration shared by every pass of a sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NanopassConfig {
    /// Policy for declared children without a builder when a pass result is built
    pub missing_child_behavior: MissingChildBehavior,
    /// Fail `PassSequenceBuilder::build` when a declared pass is not reachable
    /// from the root instead of logging a warning
    pub reject_unreachable_passes: bool,
    /// Emit a trace event for every node visited while applying a pass
    pub trace_nodes: bool,
}

impl Default for NanopassConfig {
    fn default() -> Self {
        Self {
            missing_child_behavior: MissingChildBehavior::Throw,
            reject_unreachable_passes: false,
            trace_nodes: false,
        }
    }
}

impl NanopassConfig {
    /// Engine configured from this config
    pub fn transformer(&self) -> PassTransformer {
        PassTransformer::new()
            .missing_child_behavior(self.missing_child_behavior)
            .trace_nodes(self.trace_nodes)
    }
}
