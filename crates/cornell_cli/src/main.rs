use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cornell_core::{SceneDescription, SceneGeometry};
use cornell_renderer::{RenderConfig, Renderer, DEFAULT_CHUNK_SIZE};
use image::ImageFormat;

/// Render a diffuse triangle enclosure with Monte Carlo path tracing.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Image width in pixels
    #[clap(long, default_value_t = 1024)]
    width: u32,

    /// Image height in pixels
    #[clap(long, default_value_t = 720)]
    height: u32,

    /// Samples per pixel
    #[clap(short, long, default_value_t = 48)]
    samples: u32,

    /// Edge length of the square chunks handed to workers
    #[clap(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: u32,

    /// Worker threads [default: available cores minus two, at least one]
    #[clap(short = 'j', long)]
    threads: Option<usize>,

    /// Seed for a reproducible render [default: random]
    #[clap(long)]
    seed: Option<u64>,

    /// JSON scene description [default: the built-in Cornell box]
    #[clap(long)]
    scene: Option<PathBuf>,

    /// Write the scene being rendered as JSON and exit
    #[clap(long)]
    dump_scene: Option<PathBuf>,

    /// Output image; the format follows the extension
    #[clap(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Log level (error, warn, info, debug, trace); overrides RUST_LOG
    #[clap(long)]
    log_level: Option<log::LevelFilter>,
}

impl Args {
    fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig::default()
            .with_samples(self.samples)
            .with_chunk_size(self.chunk_size);
        config.threads = self.threads;
        config.seed = self.seed;
        config
    }
}

fn load_scene(path: Option<&PathBuf>) -> Result<SceneGeometry> {
    match path {
        Some(path) => {
            let description = SceneDescription::load(path)
                .with_context(|| format!("Failed to read scene {}", path.display()))?;
            SceneGeometry::from_description(description)
                .with_context(|| format!("Invalid scene {}", path.display()))
        }
        None => SceneGeometry::cornell_box().context("Failed to build the Cornell box"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = args.log_level {
        logger.filter_level(level);
    }
    logger.init();

    let scene = load_scene(args.scene.as_ref())?;

    if let Some(path) = &args.dump_scene {
        let json = scene.to_description().to_json_string()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write scene {}", path.display()))?;
        log::info!("Wrote scene to {}", path.display());
        return Ok(());
    }

    // Fail on a bad output path before spending minutes rendering
    ImageFormat::from_path(&args.output)
        .with_context(|| format!("Unsupported output format: {}", args.output.display()))?;

    log::info!(
        "Scene: {} triangles, {} emissive",
        scene.len(),
        scene.lights().count()
    );

    let renderer = Renderer::new(Arc::new(scene)).with_config(args.render_config());
    let image = renderer
        .render(args.width, args.height)
        .context("Render failed")?;

    image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Saved {}", args.output.display());

    Ok(())
}
