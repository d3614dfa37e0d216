//! The graph builder: turns definitions plus caller arguments into a validated node set
//! and lowers it into a prompt document.

use crate::definition::{Definition, InputSpec, NodeDefinition, SubgraphDefinition};
use crate::error::{BuildError, CompileError};
use crate::prompt::Prompt;
use ahash::AHashMap;
use itertools::Itertools;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

mod args;
mod expander;
mod handle;
mod lowering;
pub mod visualizer;

pub use args::{Arg, Args};
pub use expander::SubgraphOutputs;
pub use handle::{AddOptions, Handle, NodeHandle, NodeId, Out, SubgraphHandle};

use lowering::Lowering;

/// The `add` capability handed to subgraph build procedures.
///
/// `GraphBuilder` implements it, so nested subgraphs expand against the same node set.
pub trait BuildContext {
    fn add(
        &mut self,
        definition: &Definition,
        args: Args,
        options: AddOptions,
    ) -> Result<Handle, BuildError>;

    fn add_node(
        &mut self,
        definition: &Arc<NodeDefinition>,
        args: Args,
        options: AddOptions,
    ) -> Result<NodeHandle, BuildError>;

    fn add_subgraph(
        &mut self,
        definition: &Arc<SubgraphDefinition>,
        args: Args,
        options: AddOptions,
    ) -> Result<SubgraphHandle, BuildError>;
}

/// Settings for a `GraphBuilder`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GraphBuilderConfig {
    /// First id handed out.
    pub id_start: u64,
    /// Reseed the id counter on `clear` so replayed constructions get identical ids.
    pub stable_ids: bool,
    /// Reject missing required inputs and undeclared argument names at `add` time.
    pub strict: bool,
}

impl Default for GraphBuilderConfig {
    fn default() -> Self {
        Self {
            id_start: 1,
            stable_ids: true,
            strict: true,
        }
    }
}

impl GraphBuilderConfig {
    pub fn with_id_start(mut self, id_start: u64) -> Self {
        self.id_start = id_start;
        self
    }

    pub fn with_stable_ids(mut self, stable_ids: bool) -> Self {
        self.stable_ids = stable_ids;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(self) -> GraphBuilder {
        GraphBuilder::with_config(self)
    }
}

/// One primitive node registered in a builder, with its arguments already resolved.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    id: NodeId,
    definition: Arc<NodeDefinition>,
    label: Option<String>,
    args: Args,
}

impl NodeRecord {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn definition(&self) -> &NodeDefinition {
        &self.definition
    }

    pub fn class_type(&self) -> &str {
        self.definition.type_name()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Arguments after defaults were applied.
    pub fn args(&self) -> &Args {
        &self.args
    }
}

/// Assembles one workflow. Owns its node set and id counter exclusively.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    config: GraphBuilderConfig,
    nodes: Vec<NodeRecord>,
    index: AHashMap<NodeId, usize>,
    next_id: u64,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_config(GraphBuilderConfig::default())
    }

    pub fn builder() -> GraphBuilderConfig {
        GraphBuilderConfig::default()
    }

    pub fn with_config(config: GraphBuilderConfig) -> Self {
        Self {
            next_id: config.id_start,
            config,
            nodes: Vec::new(),
            index: AHashMap::new(),
        }
    }

    pub fn config(&self) -> &GraphBuilderConfig {
        &self.config
    }

    /// Instantiates `definition`. Primitive nodes are registered directly; subgraphs
    /// are expanded and only the nodes they create are registered.
    pub fn add(
        &mut self,
        definition: &Definition,
        args: Args,
        options: AddOptions,
    ) -> Result<Handle, BuildError> {
        match definition {
            Definition::Node(def) => self.add_node(def, args, options).map(Handle::Node),
            Definition::Subgraph(def) => {
                self.add_subgraph(def, args, options).map(Handle::Subgraph)
            }
        }
    }

    pub fn add_node(
        &mut self,
        definition: &Arc<NodeDefinition>,
        args: Args,
        options: AddOptions,
    ) -> Result<NodeHandle, BuildError> {
        let args = self.resolve_args(definition.type_name(), definition.input_slice(), args)?;
        let id = self.alloc_id()?;

        let outputs = definition
            .outputs()
            .map(|(name, spec)| {
                (
                    name.to_string(),
                    Out::new(spec.kind.clone(), id, spec.index),
                )
            })
            .collect();

        debug!(
            node_id = %id,
            class_type = definition.type_name(),
            label = options.label.as_deref(),
            "added node"
        );

        self.index.insert(id, self.nodes.len());
        self.nodes.push(NodeRecord {
            id,
            definition: definition.clone(),
            label: options.label.clone(),
            args,
        });

        Ok(NodeHandle::new(
            id,
            definition.type_name().to_string(),
            options.label,
            outputs,
        ))
    }

    pub fn add_subgraph(
        &mut self,
        definition: &Arc<SubgraphDefinition>,
        args: Args,
        options: AddOptions,
    ) -> Result<SubgraphHandle, BuildError> {
        let args = self.resolve_args(definition.type_name(), definition.input_slice(), args)?;
        check_connections(definition.type_name(), definition.input_slice(), &args)?;
        expander::expand(self, definition, args, options)
    }

    /// Lowers the node set into a prompt document, in allocation order.
    ///
    /// Either the whole document is produced or an error is returned.
    pub fn compile(&self) -> Result<Prompt, CompileError> {
        let prompt = Lowering::new(&self.nodes, &self.index).lower()?;
        debug!(nodes = prompt.len(), "compiled prompt");
        Ok(prompt)
    }

    /// Discards every node. With `stable_ids` the id counter restarts at `id_start`,
    /// otherwise it keeps counting so ids are never reused in this session.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        if self.config.stable_ids {
            self.next_id = self.config.id_start;
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.iter()
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// The id the next added node will receive.
    pub fn next_id(&self) -> NodeId {
        NodeId::new(self.next_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn display(&self) -> visualizer::GraphDisplay<'_> {
        visualizer::GraphDisplay::new(self)
    }

    /// `u64::MAX` is never handed out; it marks the counter as exhausted.
    fn alloc_id(&mut self) -> Result<NodeId, BuildError> {
        let id = NodeId::new(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(BuildError::IdSpaceExhausted(id))?;
        Ok(id)
    }

    /// Applies declared defaults and, in strict mode, rejects undeclared names and
    /// missing required inputs.
    fn resolve_args(
        &self,
        type_name: &str,
        inputs: &[(String, InputSpec)],
        mut args: Args,
    ) -> Result<Args, BuildError> {
        let unknown: Vec<String> = args
            .names()
            .filter(|name| !inputs.iter().any(|(n, _)| n.as_str() == *name))
            .map(str::to_string)
            .sorted()
            .collect();

        for name in unknown {
            if self.config.strict {
                return Err(BuildError::UnknownInput {
                    type_name: type_name.to_string(),
                    input: name,
                    declared: inputs.iter().map(|(n, _)| n).join(", "),
                });
            }
            warn!(type_name = type_name, input = %name, "ignoring undeclared input");
            args.remove(&name);
        }

        for (name, spec) in inputs {
            if args.contains(name) {
                continue;
            }
            match &spec.default {
                Some(default) => args.set(name.clone(), default.clone()),
                None if spec.required && self.config.strict => {
                    return Err(BuildError::MissingRequiredInput {
                        type_name: type_name.to_string(),
                        input: name.clone(),
                    });
                }
                None => {}
            }
        }

        Ok(args)
    }
}

/// Subgraph arguments are never lowered, so their connections are kind-checked here,
/// before the build procedure sees them.
fn check_connections(
    type_name: &str,
    inputs: &[(String, InputSpec)],
    args: &Args,
) -> Result<(), BuildError> {
    for (name, spec) in inputs {
        let Some(out) = args.connection(name) else {
            continue;
        };
        match &spec.kind {
            None => {
                return Err(BuildError::UnexpectedConnection {
                    type_name: type_name.to_string(),
                    input: name.clone(),
                });
            }
            Some(expected) if expected != out.kind() => {
                return Err(BuildError::ArgumentKindMismatch {
                    type_name: type_name.to_string(),
                    input: name.clone(),
                    expected: expected.clone(),
                    found: out.kind().clone(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

impl BuildContext for GraphBuilder {
    fn add(
        &mut self,
        definition: &Definition,
        args: Args,
        options: AddOptions,
    ) -> Result<Handle, BuildError> {
        GraphBuilder::add(self, definition, args, options)
    }

    fn add_node(
        &mut self,
        definition: &Arc<NodeDefinition>,
        args: Args,
        options: AddOptions,
    ) -> Result<NodeHandle, BuildError> {
        GraphBuilder::add_node(self, definition, args, options)
    }

    fn add_subgraph(
        &mut self,
        definition: &Arc<SubgraphDefinition>,
        args: Args,
        options: AddOptions,
    ) -> Result<SubgraphHandle, BuildError> {
        GraphBuilder::add_subgraph(self, definition, args, options)
    }
}
