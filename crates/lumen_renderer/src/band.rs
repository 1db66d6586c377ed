//! Band-parallel rendering.
//!
//! The image is split into contiguous row ranges (bands), one per worker.
//! Each worker owns a disjoint slice of a shared, pre-allocated
//! framebuffer, so no synchronization is needed on the pixels. Workers run
//! on a dedicated rayon pool and are joined before the image is returned.

use std::time::Instant;

use crate::error::RenderError;
use crate::renderer::{color_to_rgb8, render_pixel, RenderConfig};
use crate::Scene;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

/// A contiguous range of image rows `[start_row, end_row)`.
///
/// Rows are image-space: row 0 is the bottom of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Index of this band, 0 being the topmost
    pub index: usize,
    pub start_row: u32,
    pub end_row: u32,
}

impl Band {
    /// Number of rows in the band.
    pub fn rows(&self) -> u32 {
        self.end_row - self.start_row
    }
}

/// Split `height` rows into `count` bands, ordered from the top of the image down.
///
/// Every band but the topmost gets `height / count` rows; the topmost
/// absorbs the remainder.
pub fn generate_bands(height: u32, count: u32) -> Vec<Band> {
    if count == 0 {
        return Vec::new();
    }

    let step = height / count;
    let boundary = |i: u32| if i == count { height } else { step * i };

    (0..count)
        .rev()
        .enumerate()
        .map(|(index, i)| Band {
            index,
            start_row: boundary(i),
            end_row: boundary(i + 1),
        })
        .collect()
}

/// 8-bit RGB image, stored top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Framebuffer {
    /// Create a black framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 3],
        }
    }

    /// Pixel at column `x` of stored row `row` (row 0 is the top of the image).
    pub fn get(&self, x: u32, row: u32) -> [u8; 3] {
        let i = (row as usize * self.width as usize + x as usize) * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Bytes per stored row.
    fn stride(&self) -> usize {
        self.width as usize * 3
    }
}

/// Render one band into `rows`, the band's slice of the framebuffer.
///
/// Image rows are traced from the top of the band down, matching the
/// order they are stored in.
pub fn render_band(
    scene: &Scene,
    config: &RenderConfig,
    band: &Band,
    rows: &mut [u8],
    rng: &mut dyn RngCore,
) {
    let stride = config.width as usize * 3;

    for (row, j) in (band.start_row..band.end_row).rev().enumerate() {
        let line = &mut rows[row * stride..(row + 1) * stride];
        for (i, pixel) in line.chunks_exact_mut(3).enumerate() {
            let color = render_pixel(scene, i as u32, j, config, rng);
            pixel.copy_from_slice(&color_to_rgb8(color));
        }
    }
}

/// Render the whole scene, one band per worker thread.
///
/// Fails only if the configuration is invalid or the worker pool cannot start.
pub fn render(scene: &Scene, config: &RenderConfig) -> Result<Framebuffer, RenderError> {
    config.validate()?;

    let start = Instant::now();
    let mut framebuffer = Framebuffer::new(config.width, config.height);
    let bands = generate_bands(config.height, config.bands);

    log::info!(
        "Rendering {}x{} @ {} spp (max depth {}) across {} bands",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        bands.len()
    );

    // Bands are ordered top-down, as are the stored rows
    let stride = framebuffer.stride();
    let mut work = Vec::with_capacity(bands.len());
    let mut remaining = framebuffer.pixels.as_mut_slice();
    for band in &bands {
        let (slice, rest) =
            std::mem::take(&mut remaining).split_at_mut(band.rows() as usize * stride);
        work.push((*band, slice));
        remaining = rest;
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(bands.len())
        .thread_name(|i| format!("lumen-band-{i}"))
        .build()?;

    pool.install(|| {
        work.into_par_iter().for_each(|(band, slice)| {
            let band_start = Instant::now();
            log::debug!(
                "Band {} started: rows {}..{}",
                band.index,
                band.start_row,
                band.end_row
            );

            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(band.index as u64)),
                None => StdRng::from_entropy(),
            };
            render_band(scene, config, &band, slice, &mut rng);

            log::debug!(
                "Band {} finished in {:.2}s",
                band.index,
                band_start.elapsed().as_secs_f64()
            );
        });
    });

    log::info!("Render finished in {:.2}s", start.elapsed().as_secs_f64());

    Ok(framebuffer)
}
