//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative bounce loop with a configurable depth cap
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma-2 encoding to 8-bit channels

use crate::error::RenderError;
use crate::sampling::gen_f32;
use crate::{Background, Color, Hittable, Scene};
use lumen_math::{Interval, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Smallest accepted hit distance; suppresses self-intersection ("shadow acne").
pub const T_MIN: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of scattered rays followed per camera ray
    pub max_depth: u32,
    /// Number of row bands rendered in parallel
    pub bands: u32,
    /// Seed for reproducible renders; band `i` uses `seed + i`
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            samples_per_pixel: 100,
            max_depth: 50,
            bands: 8,
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.bands == 0 {
            return Err(RenderError::InvalidConfig(
                "bands must be at least 1".to_string(),
            ));
        }
        if self.bands > self.height {
            return Err(RenderError::InvalidConfig(format!(
                "{} bands requested for an image {} rows tall",
                self.bands, self.height
            )));
        }
        Ok(())
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Compute the color seen by a ray.
///
/// Each hit adds the surface's emission weighted by the attenuation
/// accumulated so far. The path ends on a miss (background), an absorbed
/// scatter, or after `max_depth` scattered rays.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    background: &Background,
    max_depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut color = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;
    let mut depth = 0;

    loop {
        let Some(rec) = world.hit(&ray, Interval::new(T_MIN, f32::INFINITY), rng) else {
            return color + throughput * background.color(&ray);
        };

        color += throughput * rec.material.emitted(rec.u, rec.v, rec.p);

        if depth >= max_depth {
            return color;
        }

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
                depth += 1;
            }
            // Absorbed
            None => return color,
        }
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
///
/// Channels are clamped to [0, 1] after gamma, then scaled by 255.99 and
/// truncated, so 0.0 maps to 0 and 1.0 maps to 255.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let encode = |c: f32| (255.99 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}

/// Render a single pixel with multi-sampling.
///
/// `(x, y)` are image coordinates with the origin at the bottom-left
/// corner. Returns the linear average over all samples.
pub fn render_pixel(
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / config.width as f32;
        let t = (y as f32 + gen_f32(rng)) / config.height as f32;
        let ray = scene.camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, &scene.world, &scene.background, config.max_depth, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}
