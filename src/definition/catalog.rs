use super::{Definition, InputSpec, NodeDefinition, OutputSpec, SubgraphDefinition};
use crate::error::{BuildError, DefinitionError};
use ahash::AHashMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

/// A name-keyed registry of node and subgraph definitions.
///
/// Registration order is preserved for iteration.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    definitions: Vec<Definition>,
    by_name: AHashMap<String, usize>,
}

/// On-disk shape of one primitive node definition.
#[derive(Deserialize)]
struct RawNodeDefinition {
    #[serde(default)]
    inputs: BTreeMap<String, InputSpec>,
    #[serde(default)]
    outputs: BTreeMap<String, OutputSpec>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads primitive node definitions from a JSON document of the form
    /// `{ "<type>": { "inputs": { ... }, "outputs": { ... } } }`.
    ///
    /// Inputs are declared in name order and outputs in index order.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let raw: BTreeMap<String, RawNodeDefinition> = serde_json::from_str(json)
            .map_err(|e| DefinitionError::CatalogParseError(e.to_string()))?;

        let mut catalog = Self::new();
        for (type_name, raw_def) in raw {
            let mut outputs: Vec<_> = raw_def.outputs.into_iter().collect();
            outputs.sort_by_key(|(_, spec)| spec.index);

            let builder = raw_def
                .inputs
                .into_iter()
                .fold(NodeDefinition::builder(type_name), |b, (name, spec)| {
                    b.input(name, spec)
                });
            let definition = outputs
                .into_iter()
                .fold(builder, |b, (name, spec)| b.output(name, spec.kind, spec.index))
                .build()?;
            catalog.register(definition)?;
        }
        Ok(catalog)
    }

    /// Loads a catalog from a JSON file. See [`Catalog::from_json`].
    pub fn from_file(path: &str) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path).map_err(|e| {
            DefinitionError::CatalogParseError(format!("Could not read '{}': {}", path, e))
        })?;
        Self::from_json(&content)
    }

    /// Adds a definition. Type names must be unique within a catalog.
    pub fn register(&mut self, definition: impl Into<Definition>) -> Result<(), DefinitionError> {
        let definition = definition.into();
        let name = definition.type_name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(DefinitionError::DuplicateDefinition(name));
        }
        self.by_name.insert(name, self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    pub fn with(mut self, definition: impl Into<Definition>) -> Result<Self, DefinitionError> {
        self.register(definition)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Result<&Definition, BuildError> {
        self.by_name
            .get(name)
            .map(|&i| &self.definitions[i])
            .ok_or_else(|| BuildError::UnknownDefinition(name.to_string()))
    }

    /// Looks up a primitive node definition by type name.
    pub fn node(&self, name: &str) -> Result<Arc<NodeDefinition>, BuildError> {
        match self.get(name)? {
            Definition::Node(def) => Ok(def.clone()),
            other => Err(BuildError::WrongDefinitionKind {
                name: name.to_string(),
                expected: "node",
                found: other.variant_name(),
            }),
        }
    }

    /// Looks up a subgraph definition by type name.
    pub fn subgraph(&self, name: &str) -> Result<Arc<SubgraphDefinition>, BuildError> {
        match self.get(name)? {
            Definition::Subgraph(def) => Ok(def.clone()),
            other => Err(BuildError::WrongDefinitionKind {
                name: name.to_string(),
                expected: "subgraph",
                found: other.variant_name(),
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
