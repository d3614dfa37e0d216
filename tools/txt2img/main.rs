use clap::Parser;
use comfyforge::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Builds a minimal text-to-image workflow and prints the compiled prompt
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Positive prompt text
    #[arg(long, default_value = "a scenic landscape, best quality")]
    prompt: String,

    /// Negative prompt text
    #[arg(long, default_value = "lowres, blurry")]
    negative: String,

    #[arg(long, default_value_t = 20)]
    steps: u32,

    #[arg(long, default_value_t = 7.0)]
    cfg: f64,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Checkpoint file name as known to the server
    #[arg(long, env = "CKPT_NAME", default_value = "sd_xl_base_1.0.safetensors")]
    ckpt: String,

    #[arg(long, default_value = "euler")]
    sampler: String,

    #[arg(long, default_value = "normal")]
    scheduler: String,

    #[arg(long, default_value_t = 512)]
    width: u32,

    #[arg(long, default_value_t = 512)]
    height: u32,

    /// Filename prefix for the saved images
    #[arg(long, env = "SAVE_PREFIX", default_value = "txt2img_example")]
    prefix: String,

    /// Load node definitions from a catalog file instead of the built-in set
    #[arg(long)]
    catalog: Option<String>,

    /// Write the prompt to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Wrap the prompt in a `{"prompt": ...}` request body
    #[arg(long)]
    request: bool,

    /// Client id to embed in the request body
    #[arg(long, requires = "request")]
    client_id: Option<String>,

    /// Print the node listing to stderr before compiling
    #[arg(long)]
    show_graph: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        exit_with_error(&e.to_string());
    }
}

fn run(cli: Cli) -> Result<()> {
    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_file(path)?,
        None => builtin_catalog()?,
    };

    let graph = build_graph(&catalog, &cli)?;
    if cli.show_graph {
        eprintln!("{}", graph.display());
    }

    let prompt = graph.compile()?;
    let json = if cli.request {
        serde_json::to_string_pretty(&prompt.into_request(cli.client_id.clone()))?
    } else {
        prompt.to_json_pretty()?
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!("Wrote prompt to '{}'", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn build_graph(catalog: &Catalog, cli: &Cli) -> Result<GraphBuilder> {
    let mut g = GraphBuilder::new();

    let loader = g.add_node(
        &catalog.node("CheckpointLoaderSimple")?,
        Args::new().with("ckpt_name", cli.ckpt.as_str()),
        AddOptions::labeled("ckpt"),
    )?;

    let encode = catalog.node("CLIPTextEncode")?;
    let positive = g.add_node(
        &encode,
        Args::new()
            .with("text", cli.prompt.as_str())
            .with("clip", loader.out("clip")?),
        AddOptions::labeled("positive"),
    )?;
    let negative = g.add_node(
        &encode,
        Args::new()
            .with("text", cli.negative.as_str())
            .with("clip", loader.out("clip")?),
        AddOptions::labeled("negative"),
    )?;

    let latent = g.add_node(
        &catalog.node("EmptyLatentImage")?,
        Args::new()
            .with("width", cli.width)
            .with("height", cli.height)
            .with("batch_size", 1),
        AddOptions::labeled("latent"),
    )?;

    let sampled = g.add_node(
        &catalog.node("KSampler")?,
        Args::new()
            .with("model", loader.out("model")?)
            .with("positive", positive.out("conditioning")?)
            .with("negative", negative.out("conditioning")?)
            .with("latent_image", latent.out("latent")?)
            .with("seed", cli.seed)
            .with("steps", cli.steps)
            .with("cfg", cli.cfg)
            .with("sampler_name", cli.sampler.as_str())
            .with("scheduler", cli.scheduler.as_str())
            .with("denoise", 1.0),
        AddOptions::labeled("ksampler"),
    )?;

    let decoded = g.add_node(
        &catalog.node("VAEDecode")?,
        Args::new()
            .with("samples", sampled.out("latent")?)
            .with("vae", loader.out("vae")?),
        AddOptions::labeled("decode"),
    )?;

    g.add_node(
        &catalog.node("SaveImage")?,
        Args::new()
            .with("images", decoded.out("image")?)
            .with("filename_prefix", cli.prefix.as_str()),
        AddOptions::labeled("save"),
    )?;

    Ok(g)
}

/// The stock node types this workflow needs.
fn builtin_catalog() -> std::result::Result<Catalog, DefinitionError> {
    let definitions = [
        NodeDefinition::builder("CheckpointLoaderSimple")
            .input("ckpt_name", InputSpec::scalar().required())
            .output("model", "MODEL", 0)
            .output("clip", "CLIP", 1)
            .output("vae", "VAE", 2)
            .build()?,
        NodeDefinition::builder("CLIPTextEncode")
            .input("text", InputSpec::scalar().required())
            .input("clip", InputSpec::connection("CLIP").required())
            .output("conditioning", "CONDITIONING", 0)
            .build()?,
        NodeDefinition::builder("EmptyLatentImage")
            .input("width", InputSpec::scalar().required().with_default(512))
            .input("height", InputSpec::scalar().required().with_default(512))
            .input("batch_size", InputSpec::scalar().required().with_default(1))
            .output("latent", "LATENT", 0)
            .build()?,
        NodeDefinition::builder("KSampler")
            .input("model", InputSpec::connection("MODEL").required())
            .input("seed", InputSpec::scalar().required().with_default(0))
            .input("steps", InputSpec::scalar().required().with_default(20))
            .input("cfg", InputSpec::scalar().required().with_default(8.0))
            .input(
                "sampler_name",
                InputSpec::scalar()
                    .required()
                    .with_choices(["euler", "euler_ancestral", "dpmpp_2m", "ddim"]),
            )
            .input(
                "scheduler",
                InputSpec::scalar()
                    .required()
                    .with_choices(["normal", "karras", "exponential", "simple"]),
            )
            .input("positive", InputSpec::connection("CONDITIONING").required())
            .input("negative", InputSpec::connection("CONDITIONING").required())
            .input("latent_image", InputSpec::connection("LATENT").required())
            .input("denoise", InputSpec::scalar().required().with_default(1.0))
            .output("latent", "LATENT", 0)
            .build()?,
        NodeDefinition::builder("VAEDecode")
            .input("samples", InputSpec::connection("LATENT").required())
            .input("vae", InputSpec::connection("VAE").required())
            .output("image", "IMAGE", 0)
            .build()?,
        NodeDefinition::builder("SaveImage")
            .input("images", InputSpec::connection("IMAGE").required())
            .input(
                "filename_prefix",
                InputSpec::scalar().required().with_default("ComfyUI"),
            )
            .build()?,
    ];

    definitions
        .into_iter()
        .map(Arc::new)
        .try_fold(Catalog::new(), |catalog, def| catalog.with(def))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
