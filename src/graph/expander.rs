use super::{AddOptions, Args, GraphBuilder, Out, SubgraphHandle};
use crate::definition::SubgraphDefinition;
use crate::error::BuildError;
use ahash::AHashMap;
use itertools::Itertools;
use std::sync::Arc;
use tracing::debug;

/// Output references returned by a subgraph build procedure, keyed by output name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubgraphOutputs {
    outputs: AHashMap<String, Out>,
}

impl SubgraphOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, out: Out) -> Self {
        self.insert(name, out);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, out: Out) {
        self.outputs.insert(name.into(), out);
    }

    pub fn get(&self, name: &str) -> Option<&Out> {
        self.outputs.get(name)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// Runs a subgraph's build procedure against `builder` and checks that what it returns
/// matches the declared outputs. Nothing is filtered, renamed or reindexed.
///
/// There is no recursion guard: a subgraph that (indirectly) adds itself never terminates.
pub(super) fn expand(
    builder: &mut GraphBuilder,
    definition: &Arc<SubgraphDefinition>,
    args: Args,
    options: AddOptions,
) -> Result<SubgraphHandle, BuildError> {
    let first_id = builder.next_id();
    let mut returned = definition.build_procedure().build(&mut *builder, &args)?;

    let mismatch = |message: String| BuildError::SubgraphOutputMismatch {
        type_name: definition.type_name().to_string(),
        message,
    };

    let undeclared: Vec<&str> = returned
        .outputs
        .keys()
        .filter(|name| definition.output(name).is_none())
        .map(String::as_str)
        .sorted()
        .collect();
    if !undeclared.is_empty() {
        return Err(mismatch(format!(
            "undeclared outputs returned: {}",
            undeclared.join(", ")
        )));
    }

    let mut outputs = Vec::with_capacity(returned.len());
    for (name, spec) in definition.outputs() {
        let out = returned
            .outputs
            .remove(name)
            .ok_or_else(|| mismatch(format!("declared output '{}' was not returned", name)))?;
        if out.kind() != &spec.kind {
            return Err(mismatch(format!(
                "output '{}' is declared as {} but the build returned {}",
                name,
                spec.kind,
                out.kind()
            )));
        }
        outputs.push((name.to_string(), out));
    }

    debug!(
        subgraph = definition.type_name(),
        label = options.label.as_deref(),
        first_node = %first_id,
        next_node = %builder.next_id(),
        "expanded subgraph"
    );

    Ok(SubgraphHandle::new(
        definition.type_name().to_string(),
        options.label,
        outputs,
    ))
}
