use crate::schema::TypeSet;
use serde::{Deserialize, Serialize};

/// A connection between an output port and an input port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasEdge {
    pub id: String,
    pub source: String,
    pub source_port: String,
    pub target: String,
    pub target_port: String,
    pub types: TypeSet,
    /// Set when `types` was derived from the ports rather than chosen explicitly.
    /// Inferred types are not written back into the document.
    pub inferred: bool,
}

impl CanvasEdge {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// The types this edge carries given the shared types of its two ports.
    pub fn effective_types(&self, shared: &TypeSet) -> TypeSet {
        if self.inferred {
            shared.clone()
        } else {
            self.types.clone()
        }
    }
}
