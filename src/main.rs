//! Command line front end for the path tracer
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use path_tracing::cameras::{Camera, CameraConfig};
use path_tracing::render::{render, RenderConfig};
use path_tracing::scenes::Scene;

#[derive(Debug, Parser)]
#[command(about = "Render a built-in scene to an image file")]
struct Args {
    /// Scene to render
    #[arg(value_enum, default_value = "standard")]
    scene: Scene,

    /// Output image path (format inferred from the extension)
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// YAML settings file overriding image and camera parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(short, long)]
    samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(short, long)]
    depth: Option<u32>,

    /// RNG seed for reproducible renders
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct Settings {
    #[serde(default)]
    render: Option<RenderConfig>,
    #[serde(default)]
    camera: Option<CameraConfig>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Args::parse())
}

fn run(args: Args) -> anyhow::Result<()> {
    let settings = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading settings file {}", path.display()))?;
            serde_yaml::from_str(&text)
                .with_context(|| format!("parsing settings file {}", path.display()))?
        }
        None => Settings::default(),
    };

    if let Some(seed) = args.seed {
        path_tracing::random::seed(seed);
    }

    let mut config = settings.render.unwrap_or_default();
    if let Some(width) = args.width {
        config.image_width = width;
    }
    if let Some(height) = args.height {
        config.image_height = height;
    }
    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(depth) = args.depth {
        config.max_depth = depth;
    }

    log::info!("building scene {:?}", args.scene);
    let scene = args.scene.build().context("building scene")?;
    let camera_config = settings.camera.unwrap_or(scene.camera);
    let camera = Camera::from_config(&camera_config, config.aspect_ratio());

    log::info!(
        "rendering {}x{} at {} samples per pixel, depth {}",
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
        config.max_depth
    );
    let start = Instant::now();
    let img = render(scene.world.as_ref(), &camera, &scene.background, &config);
    log::info!("rendered in {:.2?}", start.elapsed());

    img.save(&args.output)
        .with_context(|| format!("writing image {}", args.output.display()))?;
    log::info!("wrote {}", args.output.display());
    Ok(())
}
