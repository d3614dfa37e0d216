//! The lowered, engine-consumable document.
//!
//! A prompt serialises as a JSON object keyed by decimal node id:
//!
//! ```json
//! { "1": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sd15.safetensors" } },
//!   "2": { "class_type": "CLIPTextEncode",
//!          "inputs": { "clip": ["1", 1], "text": "a corgi" },
//!          "_meta": { "title": "positive" } } }
//! ```

use crate::error::PromptError;
use crate::graph::NodeId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;

/// One node of a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptEntry {
    pub class_type: String,
    pub inputs: BTreeMap<String, Value>,
    /// UI-only annotations; no effect on execution.
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PromptMeta>,
}

impl PromptEntry {
    pub fn title(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.title.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A compiled workflow: node entries in ascending id order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Prompt {
    entries: Vec<(NodeId, PromptEntry)>,
}

impl Prompt {
    /// Appends an entry. Lowering inserts in allocation order, which is ascending.
    pub(crate) fn insert(&mut self, id: NodeId, entry: PromptEntry) {
        self.entries.push((id, entry));
    }

    pub fn get(&self, id: NodeId) -> Option<&PromptEntry> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &PromptEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_value(&self) -> Result<Value, PromptError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String, PromptError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, PromptError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PromptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the prompt as pretty-printed JSON.
    pub fn save(&self, path: &str) -> Result<(), PromptError> {
        fs::write(path, self.to_json_pretty()?).map_err(|source| PromptError::Io {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_file(path: &str) -> Result<Self, PromptError> {
        let content = fs::read_to_string(path).map_err(|source| PromptError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Wraps the prompt in the envelope the engine's `/prompt` endpoint expects.
    pub fn into_request(self, client_id: Option<String>) -> PromptRequest {
        PromptRequest {
            prompt: self,
            client_id,
        }
    }
}

impl Serialize for Prompt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.entries
                .iter()
                .map(|(id, entry)| (id.to_string(), entry)),
        )
    }
}

impl<'de> Deserialize<'de> for Prompt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, PromptEntry>::deserialize(deserializer)?;
        let mut entries = raw
            .into_iter()
            .map(|(key, entry)| {
                key.parse::<u64>()
                    .map(|id| (NodeId::new(id), entry))
                    .map_err(|_| D::Error::custom(format!("'{}' is not a decimal node id", key)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|(id, _)| *id);
        Ok(Self { entries })
    }
}

/// The body submitted to the engine: `{"prompt": <document>, "client_id": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: Prompt,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}
