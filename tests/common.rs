//! Common test utilities: node definitions modelled on the stock text-to-image nodes.
use comfyforge::prelude::*;
use std::sync::Arc;

/// `CheckpointLoaderSimple`: outputs MODEL (0), CLIP (1), VAE (2).
#[allow(dead_code)]
pub fn loader_def() -> Arc<NodeDefinition> {
    Arc::new(
        NodeDefinition::builder("CheckpointLoaderSimple")
            .input(
                "ckpt_name",
                InputSpec::scalar()
                    .required()
                    .with_choices(["sd15.safetensors", "sdxl.safetensors"]),
            )
            .output("model", "MODEL", 0)
            .output("clip", "CLIP", 1)
            .output("vae", "VAE", 2)
            .build()
            .expect("loader definition is well-formed"),
    )
}

#[allow(dead_code)]
pub fn encode_def() -> Arc<NodeDefinition> {
    Arc::new(
        NodeDefinition::builder("CLIPTextEncode")
            .input("text", InputSpec::scalar().required())
            .input("clip", InputSpec::connection("CLIP").required())
            .output("conditioning", "CONDITIONING", 0)
            .build()
            .expect("encode definition is well-formed"),
    )
}

#[allow(dead_code)]
pub fn empty_latent_def() -> Arc<NodeDefinition> {
    Arc::new(
        NodeDefinition::builder("EmptyLatentImage")
            .input("width", InputSpec::scalar().required().with_default(512))
            .input("height", InputSpec::scalar().required().with_default(512))
            .input("batch_size", InputSpec::scalar().required().with_default(1))
            .output("latent", "LATENT", 0)
            .build()
            .expect("latent definition is well-formed"),
    )
}

/// A reduced sampler: consumes MODEL and an optional LATENT, produces LATENT.
#[allow(dead_code)]
pub fn sampler_def() -> Arc<NodeDefinition> {
    Arc::new(
        NodeDefinition::builder("KSampler")
            .input("model", InputSpec::connection("MODEL").required())
            .input("latent_image", InputSpec::connection("LATENT"))
            .input("seed", InputSpec::scalar().required().with_default(0))
            .input("steps", InputSpec::scalar().required().with_default(20))
            .input("denoise", InputSpec::connection("FLOAT").with_default(1.0))
            .output("latent", "LATENT", 0)
            .build()
            .expect("sampler definition is well-formed"),
    )
}

/// `VAEDecode`: consumes LATENT and VAE, produces IMAGE.
#[allow(dead_code)]
pub fn decode_def() -> Arc<NodeDefinition> {
    Arc::new(
        NodeDefinition::builder("VAEDecode")
            .input("samples", InputSpec::connection("LATENT").required())
            .input("vae", InputSpec::connection("VAE").required())
            .output("image", "IMAGE", 0)
            .build()
            .expect("decode definition is well-formed"),
    )
}

#[allow(dead_code)]
pub fn save_def() -> Arc<NodeDefinition> {
    Arc::new(
        NodeDefinition::builder("SaveImage")
            .input("images", InputSpec::connection("IMAGE").required())
            .input(
                "filename_prefix",
                InputSpec::scalar().required().with_default("ComfyUI"),
            )
            .build()
            .expect("save definition is well-formed"),
    )
}

/// A subgraph that creates an empty latent and samples it, forwarding the sampler's output.
///
/// Inputs: `model` (MODEL, required), `steps` (default 12). Output: `latent` (LATENT).
#[allow(dead_code)]
pub fn sample_subgraph_def() -> Arc<SubgraphDefinition> {
    let latent = empty_latent_def();
    let sampler = sampler_def();
    Arc::new(
        SubgraphDefinition::builder("SampleFromScratch", move |ctx, args| {
            let empty = ctx.add_node(
                &latent,
                Args::new().with("width", 768),
                AddOptions::labeled("scratch latent"),
            )?;
            let model = args
                .connection("model")
                .cloned()
                .ok_or_else(|| BuildError::MissingRequiredInput {
                    type_name: "SampleFromScratch".to_string(),
                    input: "model".to_string(),
                })?;
            let steps = args.literal("steps").cloned().unwrap_or_default();
            let sampled = ctx.add_node(
                &sampler,
                Args::new()
                    .with("model", model)
                    .with("latent_image", empty.out("latent")?)
                    .with("steps", steps),
                AddOptions::default(),
            )?;
            Ok(SubgraphOutputs::new().with("latent", sampled.out("latent")?))
        })
        .input("model", InputSpec::connection("MODEL").required())
        .input("steps", InputSpec::scalar().with_default(12))
        .output("latent", "LATENT")
        .build()
        .expect("subgraph definition is well-formed"),
    )
}

/// Builds loader -> sampler -> decoder, giving ids 1, 2, 3.
#[allow(dead_code)]
pub fn build_chain(graph: &mut GraphBuilder) -> (NodeHandle, NodeHandle, NodeHandle) {
    let loader = graph
        .add_node(
            &loader_def(),
            Args::new().with("ckpt_name", "sd15.safetensors"),
            AddOptions::labeled("ckpt"),
        )
        .expect("loader is added");
    let sampler = graph
        .add_node(
            &sampler_def(),
            Args::new().with("model", loader.out("model").unwrap()),
            AddOptions::default(),
        )
        .expect("sampler is added");
    let decoder = graph
        .add_node(
            &decode_def(),
            Args::new()
                .with("samples", sampler.out("latent").unwrap())
                .with("vae", loader.out("vae").unwrap()),
            AddOptions::labeled("decode"),
        )
        .expect("decoder is added");
    (loader, sampler, decoder)
}
