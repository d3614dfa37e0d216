use super::node::{check_type_name, check_unique_inputs, check_unique_outputs};
use super::spec::{InputSpec, Kind, SubgraphOutputSpec};
use crate::error::{BuildError, DefinitionError};
use crate::graph::{Args, BuildContext, SubgraphOutputs};
use std::fmt;
use std::sync::Arc;

/// The construction logic of a subgraph.
///
/// `build` receives a context exposing the same `add` capability as the graph builder,
/// together with the subgraph's resolved arguments, and returns one output reference per
/// declared subgraph output. Any closure with the matching signature implements it.
pub trait SubgraphBuild: Send + Sync {
    fn build(
        &self,
        ctx: &mut dyn BuildContext,
        args: &Args,
    ) -> Result<SubgraphOutputs, BuildError>;
}

impl<F> SubgraphBuild for F
where
    F: Fn(&mut dyn BuildContext, &Args) -> Result<SubgraphOutputs, BuildError> + Send + Sync,
{
    fn build(
        &self,
        ctx: &mut dyn BuildContext,
        args: &Args,
    ) -> Result<SubgraphOutputs, BuildError> {
        self(ctx, args)
    }
}

/// A reusable composition of nodes that presents itself as a single unit.
#[derive(Clone)]
pub struct SubgraphDefinition {
    type_name: String,
    inputs: Vec<(String, InputSpec)>,
    outputs: Vec<(String, SubgraphOutputSpec)>,
    build: Arc<dyn SubgraphBuild>,
}

impl SubgraphDefinition {
    /// Starts a definition whose construction logic is the closure `build`.
    pub fn builder<F>(type_name: impl Into<String>, build: F) -> SubgraphDefinitionBuilder
    where
        F: Fn(&mut dyn BuildContext, &Args) -> Result<SubgraphOutputs, BuildError>
            + Send
            + Sync
            + 'static,
    {
        SubgraphDefinitionBuilder::new(type_name, Arc::new(build))
    }

    /// Starts a definition backed by an existing `SubgraphBuild` implementation.
    pub fn builder_with(
        type_name: impl Into<String>,
        build: Arc<dyn SubgraphBuild>,
    ) -> SubgraphDefinitionBuilder {
        SubgraphDefinitionBuilder::new(type_name, build)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn inputs(&self) -> impl Iterator<Item = (&str, &InputSpec)> {
        self.inputs.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn input(&self, name: &str) -> Option<&InputSpec> {
        self.inputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&str, &SubgraphOutputSpec)> {
        self.outputs.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn output(&self, name: &str) -> Option<&SubgraphOutputSpec> {
        self.outputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    pub(crate) fn input_slice(&self) -> &[(String, InputSpec)] {
        &self.inputs
    }

    pub(crate) fn build_procedure(&self) -> &dyn SubgraphBuild {
        self.build.as_ref()
    }
}

impl fmt::Debug for SubgraphDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubgraphDefinition")
            .field("type_name", &self.type_name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

/// Assembles a `SubgraphDefinition` and checks its shape on `build`.
pub struct SubgraphDefinitionBuilder {
    type_name: String,
    inputs: Vec<(String, InputSpec)>,
    outputs: Vec<(String, SubgraphOutputSpec)>,
    build: Arc<dyn SubgraphBuild>,
}

impl SubgraphDefinitionBuilder {
    fn new(type_name: impl Into<String>, build: Arc<dyn SubgraphBuild>) -> Self {
        Self {
            type_name: type_name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            build,
        }
    }

    pub fn input(mut self, name: impl Into<String>, spec: InputSpec) -> Self {
        self.inputs.push((name.into(), spec));
        self
    }

    pub fn output(mut self, name: impl Into<String>, kind: impl Into<Kind>) -> Self {
        self.outputs.push((name.into(), SubgraphOutputSpec::new(kind)));
        self
    }

    pub fn build(self) -> Result<SubgraphDefinition, DefinitionError> {
        check_type_name(&self.type_name)?;
        check_unique_inputs(&self.type_name, &self.inputs)?;
        check_unique_outputs(&self.type_name, self.outputs.iter().map(|(n, _)| n))?;

        Ok(SubgraphDefinition {
            type_name: self.type_name,
            inputs: self.inputs,
            outputs: self.outputs,
            build: self.build,
        })
    }
}
