use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// An opaque connection type tag such as `"MODEL"` or `"LATENT"`.
///
/// Kinds are only ever compared for equality; the builder never inspects their meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(String);

impl Kind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Kind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Kind {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Describes one named input of a node or subgraph definition.
///
/// An input without a `kind` is purely scalar. An input with a `kind` accepts either a
/// literal or a connection to an upstream output of the same kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InputSpec {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Value>>,
}

impl InputSpec {
    /// An optional literal-only input.
    pub fn scalar() -> Self {
        Self::default()
    }

    /// An optional input that accepts connections of `kind`.
    pub fn connection(kind: impl Into<Kind>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn accepts_connection(&self) -> bool {
        self.kind.is_some()
    }

    /// Whether `value` is one of the enumerated choices. Inputs without an
    /// enumeration allow every literal.
    pub fn allows(&self, value: &Value) -> bool {
        self.choices
            .as_ref()
            .is_none_or(|choices| choices.contains(value))
    }
}

/// Describes one named output of a primitive node definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub kind: Kind,
    /// Position in the engine's output tuple for this node type.
    pub index: u32,
}

impl OutputSpec {
    pub fn new(kind: impl Into<Kind>, index: u32) -> Self {
        Self {
            kind: kind.into(),
            index,
        }
    }
}

/// Describes one named output of a subgraph. The backing index belongs to whichever
/// primitive node the subgraph forwards, so only the kind is declared here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphOutputSpec {
    pub kind: Kind,
}

impl SubgraphOutputSpec {
    pub fn new(kind: impl Into<Kind>) -> Self {
        Self { kind: kind.into() }
    }
}
