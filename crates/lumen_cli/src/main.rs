//! Lumen - render one of the demo scenes to an image file.

mod scenes;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_renderer::{render, RenderConfig, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::scenes::SceneKind;

#[derive(Parser, Debug)]
#[command(name = "lumen", version, about = "CPU Monte Carlo path tracer")]
struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = SceneKind::Cornell)]
    scene: SceneKind,

    /// JSON render configuration; command-line values override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    samples: Option<u32>,

    /// Maximum scattered rays per camera ray
    #[arg(long)]
    depth: Option<u32>,

    /// Number of row bands (worker threads)
    #[arg(long)]
    bands: Option<u32>,

    /// Seed for a reproducible render
    #[arg(long)]
    seed: Option<u64>,

    /// Image used by the earth scene
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Output file; the format follows the extension
    #[arg(long, short = 'o', default_value = "render.png")]
    output: PathBuf,
}

impl Args {
    /// Start from the config file (or defaults) and apply any overrides.
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(bands) = self.bands {
            config.bands = bands;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("invalid render configuration")?;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<RenderConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.render_config()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let parts = scenes::build(
        args.scene,
        config.aspect_ratio(),
        args.texture.as_deref(),
        &mut rng,
    )
    .with_context(|| format!("failed to set up scene {:?}", args.scene))?;
    let scene = Scene::new(parts.objects, parts.camera, parts.background, &mut rng)
        .context("failed to build scene")?;

    let start = Instant::now();
    let framebuffer = render(&scene, &config).context("render failed")?;
    let elapsed = start.elapsed();

    image::save_buffer(
        &args.output,
        &framebuffer.pixels,
        framebuffer.width,
        framebuffer.height,
        image::ColorType::Rgb8,
    )
    .with_context(|| format!("failed to write {}", args.output.display()))?;

    log::info!(
        "Wrote {} ({}x{}) after {:.2}s",
        args.output.display(),
        framebuffer.width,
        framebuffer.height,
        elapsed.as_secs_f64()
    );

    Ok(())
}
