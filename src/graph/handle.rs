use crate::definition::Kind;
use crate::error::BuildError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node within one graph builder. Rendered as a decimal string in prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reference to one output slot of an already-built node.
///
/// This is a lookup key into the builder's node set, not an owning pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Out {
    kind: Kind,
    node: NodeId,
    index: u32,
}

impl Out {
    pub(crate) fn new(kind: Kind, node: NodeId, index: u32) -> Self {
        Self { kind, node, index }
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// The node that produces this value.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for Out {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}[{}]:{}", self.node, self.index, self.kind)
    }
}

fn find_output(
    outputs: &[(String, Out)],
    type_name: &str,
    name: &str,
) -> Result<Out, BuildError> {
    outputs
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, out)| out.clone())
        .ok_or_else(|| BuildError::UnknownOutput {
            type_name: type_name.to_string(),
            output: name.to_string(),
        })
}

/// The caller-facing result of adding a primitive node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeHandle {
    id: NodeId,
    class_type: String,
    label: Option<String>,
    outputs: Vec<(String, Out)>,
}

impl NodeHandle {
    pub(crate) fn new(
        id: NodeId,
        class_type: String,
        label: Option<String>,
        outputs: Vec<(String, Out)>,
    ) -> Self {
        Self {
            id,
            class_type,
            label,
            outputs,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn class_type(&self) -> &str {
        &self.class_type
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns a reference to the output called `name`.
    pub fn out(&self, name: &str) -> Result<Out, BuildError> {
        find_output(&self.outputs, &self.class_type, name)
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&str, &Out)> {
        self.outputs.iter().map(|(name, out)| (name.as_str(), out))
    }
}

/// The caller-facing result of expanding a subgraph. It never appears in a prompt;
/// its outputs point at the primitive nodes the subgraph created.
#[derive(Debug, Clone, PartialEq)]
pub struct SubgraphHandle {
    type_name: String,
    label: Option<String>,
    outputs: Vec<(String, Out)>,
}

impl SubgraphHandle {
    pub(crate) fn new(
        type_name: String,
        label: Option<String>,
        outputs: Vec<(String, Out)>,
    ) -> Self {
        Self {
            type_name,
            label,
            outputs,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn out(&self, name: &str) -> Result<Out, BuildError> {
        find_output(&self.outputs, &self.type_name, name)
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&str, &Out)> {
        self.outputs.iter().map(|(name, out)| (name.as_str(), out))
    }
}

/// Either kind of handle, as returned by `GraphBuilder::add`.
#[derive(Debug, Clone, PartialEq)]
pub enum Handle {
    Node(NodeHandle),
    Subgraph(SubgraphHandle),
}

impl Handle {
    pub fn out(&self, name: &str) -> Result<Out, BuildError> {
        match self {
            Handle::Node(h) => h.out(name),
            Handle::Subgraph(h) => h.out(name),
        }
    }

    pub fn outputs(&self) -> Box<dyn Iterator<Item = (&str, &Out)> + '_> {
        match self {
            Handle::Node(h) => Box::new(h.outputs()),
            Handle::Subgraph(h) => Box::new(h.outputs()),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Handle::Node(h) => h.label(),
            Handle::Subgraph(h) => h.label(),
        }
    }

    pub fn as_node(&self) -> Option<&NodeHandle> {
        match self {
            Handle::Node(h) => Some(h),
            Handle::Subgraph(_) => None,
        }
    }

    pub fn into_node(self) -> Option<NodeHandle> {
        match self {
            Handle::Node(h) => Some(h),
            Handle::Subgraph(_) => None,
        }
    }

    pub fn into_subgraph(self) -> Option<SubgraphHandle> {
        match self {
            Handle::Subgraph(h) => Some(h),
            Handle::Node(_) => None,
        }
    }
}

/// Per-call options for `GraphBuilder::add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOptions {
    /// Human-facing title, emitted as `_meta.title` in the prompt.
    pub label: Option<String>,
}

impl AddOptions {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}
