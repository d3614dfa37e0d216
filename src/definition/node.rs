use super::spec::{InputSpec, Kind, OutputSpec};
use crate::error::DefinitionError;
use ahash::AHashMap;

/// An immutable description of a primitive node type: its engine `class_type`,
/// its declared inputs and its indexed outputs, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDefinition {
    type_name: String,
    inputs: Vec<(String, InputSpec)>,
    outputs: Vec<(String, OutputSpec)>,
}

impl NodeDefinition {
    pub fn builder(type_name: impl Into<String>) -> NodeDefinitionBuilder {
        NodeDefinitionBuilder::new(type_name)
    }

    /// The engine-side `class_type` of this node.
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

    pub fn outputs(&self) -> impl Iterator<Item = (&str, &OutputSpec)> {
        self.outputs.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn output(&self, name: &str) -> Option<&OutputSpec> {
        self.outputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    /// Looks up the output occupying slot `index` of the engine's output tuple.
    pub fn output_at(&self, index: u32) -> Option<(&str, &OutputSpec)> {
        self.outputs().find(|(_, spec)| spec.index == index)
    }

    pub(crate) fn input_slice(&self) -> &[(String, InputSpec)] {
        &self.inputs
    }
}

/// Assembles a `NodeDefinition` and checks its shape on `build`.
#[derive(Debug, Clone)]
pub struct NodeDefinitionBuilder {
    type_name: String,
    inputs: Vec<(String, InputSpec)>,
    outputs: Vec<(String, OutputSpec)>,
}

impl NodeDefinitionBuilder {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn input(mut self, name: impl Into<String>, spec: InputSpec) -> Self {
        self.inputs.push((name.into(), spec));
        self
    }

    pub fn output(mut self, name: impl Into<String>, kind: impl Into<Kind>, index: u32) -> Self {
        self.outputs.push((name.into(), OutputSpec::new(kind, index)));
        self
    }

    pub fn build(self) -> Result<NodeDefinition, DefinitionError> {
        check_type_name(&self.type_name)?;
        check_unique_inputs(&self.type_name, &self.inputs)?;
        check_unique_outputs(&self.type_name, self.outputs.iter().map(|(n, _)| n))?;

        let mut by_index: AHashMap<u32, &str> = AHashMap::new();
        for (name, spec) in &self.outputs {
            if let Some(first) = by_index.insert(spec.index, name) {
                return Err(DefinitionError::DuplicateOutputIndex {
                    type_name: self.type_name.clone(),
                    index: spec.index,
                    first: first.to_string(),
                    second: name.clone(),
                });
            }
        }

        Ok(NodeDefinition {
            type_name: self.type_name,
            inputs: self.inputs,
            outputs: self.outputs,
        })
    }
}

pub(super) fn check_type_name(type_name: &str) -> Result<(), DefinitionError> {
    if type_name.trim().is_empty() {
        Err(DefinitionError::EmptyTypeName)
    } else {
        Ok(())
    }
}

pub(super) fn check_unique_inputs(
    type_name: &str,
    inputs: &[(String, InputSpec)],
) -> Result<(), DefinitionError> {
    let mut seen = ahash::AHashSet::new();
    for (name, _) in inputs {
        if !seen.insert(name.as_str()) {
            return Err(DefinitionError::DuplicateInput {
                type_name: type_name.to_string(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}

pub(super) fn check_unique_outputs<'a>(
    type_name: &str,
    names: impl Iterator<Item = &'a String>,
) -> Result<(), DefinitionError> {
    let mut seen = ahash::AHashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(DefinitionError::DuplicateOutput {
                type_name: type_name.to_string(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}
