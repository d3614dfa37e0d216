//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the comfyforge crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use comfyforge::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let catalog = Catalog::from_file("path/to/definitions.json")?;
//! let loader = catalog.node("CheckpointLoaderSimple")?;
//!
//! let mut graph = GraphBuilder::new();
//! graph.add_node(
//!     &loader,
//!     Args::new().with("ckpt_name", "sd15.safetensors"),
//!     AddOptions::default(),
//! )?;
//! graph.compile()?.save("prompt.json")?;
//! # Ok(())
//! # }
//! ```

// Definitions
pub use crate::definition::{
    Catalog, Definition, InputSpec, Kind, NodeDefinition, OutputSpec, SubgraphBuild,
    SubgraphDefinition, SubgraphOutputSpec,
};

// Graph construction
pub use crate::graph::{
    AddOptions, Arg, Args, BuildContext, GraphBuilder, GraphBuilderConfig, Handle, NodeHandle,
    NodeId, Out, SubgraphHandle, SubgraphOutputs,
};

// Lowered document
pub use crate::prompt::{Prompt, PromptEntry, PromptMeta, PromptRequest};

// Error types
pub use crate::error::{BuildError, CompileError, DefinitionError, PromptError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
