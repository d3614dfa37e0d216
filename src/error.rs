use crate::definition::Kind;
use crate::graph::NodeId;
use thiserror::Error;

/// Errors raised while assembling a node or subgraph definition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    #[error("Definition type name must not be empty")]
    EmptyTypeName,

    #[error("Definition '{type_name}' declares input '{name}' more than once")]
    DuplicateInput { type_name: String, name: String },

    #[error("Definition '{type_name}' declares output '{name}' more than once")]
    DuplicateOutput { type_name: String, name: String },

    #[error(
        "Definition '{type_name}' assigns output index {index} to both '{first}' and '{second}'"
    )]
    DuplicateOutputIndex {
        type_name: String,
        index: u32,
        first: String,
        second: String,
    },

    #[error("Catalog already contains a definition named '{0}'")]
    DuplicateDefinition(String),

    #[error("Failed to parse definition catalog: {0}")]
    CatalogParseError(String),
}

/// Errors that can occur while adding nodes and subgraphs to a graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("No definition named '{0}' is registered")]
    UnknownDefinition(String),

    #[error("Definition '{name}' is a {found}, not a {expected}")]
    WrongDefinitionKind {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Missing required input '{input}' for '{type_name}'")]
    MissingRequiredInput { type_name: String, input: String },

    #[error("'{type_name}' has no input named '{input}' (declared: {declared})")]
    UnknownInput {
        type_name: String,
        input: String,
        declared: String,
    },

    #[error("'{type_name}' has no output named '{output}'")]
    UnknownOutput { type_name: String, output: String },

    #[error("Subgraph '{type_name}' returned malformed outputs: {message}")]
    SubgraphOutputMismatch { type_name: String, message: String },

    #[error(
        "Kind mismatch on input '{input}' of '{type_name}': expected {expected}, got {found}"
    )]
    ArgumentKindMismatch {
        type_name: String,
        input: String,
        expected: Kind,
        found: Kind,
    },

    #[error(
        "Input '{input}' of '{type_name}' only accepts literal values, but a connection was given"
    )]
    UnexpectedConnection { type_name: String, input: String },

    #[error("Node id space is exhausted at {0}")]
    IdSpaceExhausted(NodeId),
}

/// Errors that can occur while lowering a graph into a prompt document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(
        "Kind mismatch on input '{input}' of node {node_id}: expected {expected}, got {found}"
    )]
    KindMismatch {
        node_id: NodeId,
        input: String,
        expected: Kind,
        found: Kind,
    },

    #[error(
        "Input '{input}' of node {node_id} references output {index} of node {missing_node_id}, which is not part of this graph"
    )]
    DanglingReference {
        node_id: NodeId,
        input: String,
        missing_node_id: NodeId,
        index: u32,
    },

    #[error("Input '{input}' of node {node_id} only accepts literal values, but a connection was given")]
    UnexpectedConnection { node_id: NodeId, input: String },
}

/// Errors that can occur when reading or writing prompt documents.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Prompt I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Prompt JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}
