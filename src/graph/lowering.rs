use super::{Arg, NodeId, NodeRecord, Out};
use crate::definition::InputSpec;
use crate::error::CompileError;
use crate::prompt::{Prompt, PromptEntry, PromptMeta};
use ahash::AHashMap;
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Walks a builder's node set and produces the prompt document.
pub(super) struct Lowering<'a> {
    nodes: &'a [NodeRecord],
    index: &'a AHashMap<NodeId, usize>,
}

impl<'a> Lowering<'a> {
    pub(super) fn new(nodes: &'a [NodeRecord], index: &'a AHashMap<NodeId, usize>) -> Self {
        Self { nodes, index }
    }

    pub(super) fn lower(&self) -> Result<Prompt, CompileError> {
        let mut prompt = Prompt::default();
        for record in self.nodes {
            let entry = PromptEntry {
                class_type: record.class_type().to_string(),
                inputs: self.lower_inputs(record)?,
                meta: record.label().map(|title| PromptMeta {
                    title: Some(title.to_string()),
                }),
            };
            prompt.insert(record.id(), entry);
        }
        Ok(prompt)
    }

    fn lower_inputs(
        &self,
        record: &NodeRecord,
    ) -> Result<BTreeMap<String, Value>, CompileError> {
        let mut inputs = BTreeMap::new();
        for (name, spec) in record.definition().inputs() {
            // Defaults were folded into the args when the node was added.
            let value = match record.args().get(name) {
                None => continue,
                Some(Arg::Literal(value)) => value.clone(),
                Some(Arg::Connection(out)) => self.lower_connection(record, name, spec, out)?,
            };
            inputs.insert(name.to_string(), value);
        }
        Ok(inputs)
    }

    /// Encodes a connection as `["<producer id>", <output index>]` after checking that the
    /// kinds agree and that the producer exists in this graph.
    fn lower_connection(
        &self,
        record: &NodeRecord,
        input: &str,
        spec: &InputSpec,
        out: &Out,
    ) -> Result<Value, CompileError> {
        let expected = spec
            .kind
            .as_ref()
            .ok_or_else(|| CompileError::UnexpectedConnection {
                node_id: record.id(),
                input: input.to_string(),
            })?;

        if out.kind() != expected {
            return Err(CompileError::KindMismatch {
                node_id: record.id(),
                input: input.to_string(),
                expected: expected.clone(),
                found: out.kind().clone(),
            });
        }

        let dangling = || CompileError::DanglingReference {
            node_id: record.id(),
            input: input.to_string(),
            missing_node_id: out.node(),
            index: out.index(),
        };

        let producer = self
            .index
            .get(&out.node())
            .map(|&i| &self.nodes[i])
            .ok_or_else(dangling)?;

        match producer.definition().output_at(out.index()) {
            Some((_, produced)) if &produced.kind == out.kind() => {}
            _ => return Err(dangling()),
        }

        Ok(json!([out.node().to_string(), out.index()]))
    }
}
