//! # comfyforge - Typed Workflow Graphs for ComfyUI
//!
//! **comfyforge** lets you assemble an image-generation workflow as a directed acyclic graph
//! of typed nodes, checks every connection against the declared port kinds, and compiles
//! the result into the canonical "prompt" document a ComfyUI server executes.
//!
//! ## Core Workflow
//!
//! 1.  **Obtain Definitions**: Build `NodeDefinition`s (and optionally `SubgraphDefinition`s)
//!     by hand, or load them into a `Catalog` from a JSON file. Each definition declares its
//!     inputs (scalar or connection-typed, with defaults and enumerations) and its indexed outputs.
//! 2.  **Build the Graph**: Create a `GraphBuilder` and call `add_node` / `add_subgraph` /
//!     `add` for every step. Each call returns a handle whose outputs can be wired into later calls.
//! 3.  **Compile**: Call `GraphBuilder::compile` to lower the graph into a `Prompt`. Kind
//!     mismatches and references to nodes outside the graph are caught here.
//! 4.  **Submit**: Serialise the prompt (or `Prompt::into_request`) and hand it to your transport.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use comfyforge::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let loader = Arc::new(
//!         NodeDefinition::builder("CheckpointLoaderSimple")
//!             .input("ckpt_name", InputSpec::scalar().required())
//!             .output("model", "MODEL", 0)
//!             .output("clip", "CLIP", 1)
//!             .output("vae", "VAE", 2)
//!             .build()?,
//!     );
//!     let encode = Arc::new(
//!         NodeDefinition::builder("CLIPTextEncode")
//!             .input("text", InputSpec::scalar().required())
//!             .input("clip", InputSpec::connection("CLIP").required())
//!             .output("conditioning", "CONDITIONING", 0)
//!             .build()?,
//!     );
//!
//!     let mut graph = GraphBuilder::new();
//!     let ckpt = graph.add_node(
//!         &loader,
//!         Args::new().with("ckpt_name", "sd15.safetensors"),
//!         AddOptions::labeled("ckpt"),
//!     )?;
//!     graph.add_node(
//!         &encode,
//!         Args::new()
//!             .with("text", "a corgi, studio lighting")
//!             .with("clip", ckpt.out("clip")?),
//!         AddOptions::labeled("positive"),
//!     )?;
//!
//!     let prompt = graph.compile()?;
//!     println!("{}", prompt.to_json_pretty()?);
//!     Ok(())
//! }
//! ```

pub mod definition;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod prompt;

pub use graph::GraphBuilder;
pub use prompt::Prompt;
