//! Immutable descriptions of node and subgraph types.
//!
//! Definitions are produced outside the builder (typically derived from an engine's
//! published node catalog) and shared read-only by every handle instantiated from them.

pub mod catalog;
pub mod node;
pub mod spec;
pub mod subgraph;

pub use catalog::*;
pub use node::*;
pub use spec::*;
pub use subgraph::*;

use std::sync::Arc;

/// Either a primitive node type or a composite subgraph type.
#[derive(Debug, Clone)]
pub enum Definition {
    Node(Arc<NodeDefinition>),
    Subgraph(Arc<SubgraphDefinition>),
}

impl Definition {
    pub fn type_name(&self) -> &str {
        match self {
            Definition::Node(def) => def.type_name(),
            Definition::Subgraph(def) => def.type_name(),
        }
    }

    pub fn input(&self, name: &str) -> Option<&InputSpec> {
        match self {
            Definition::Node(def) => def.input(name),
            Definition::Subgraph(def) => def.input(name),
        }
    }

    /// A short human-readable name for the variant, used in diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Definition::Node(_) => "node",
            Definition::Subgraph(_) => "subgraph",
        }
    }
}

impl From<NodeDefinition> for Definition {
    fn from(def: NodeDefinition) -> Self {
        Definition::Node(Arc::new(def))
    }
}

impl From<Arc<NodeDefinition>> for Definition {
    fn from(def: Arc<NodeDefinition>) -> Self {
        Definition::Node(def)
    }
}

impl From<SubgraphDefinition> for Definition {
    fn from(def: SubgraphDefinition) -> Self {
        Definition::Subgraph(Arc::new(def))
    }
}

impl From<Arc<SubgraphDefinition>> for Definition {
    fn from(def: Arc<SubgraphDefinition>) -> Self {
        Definition::Subgraph(def)
    }
}
