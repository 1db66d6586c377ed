//! Textures: pure functions from surface coordinates to color.

use std::sync::Arc;

use crate::perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};
use crate::Color;
use lumen_core::ImageData;
use lumen_math::Vec3;

/// A color lookup over surface coordinates `(u, v)` and world-space point `p`.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// 3D checker pattern picking between two textures by the sign of `sin(10x)·sin(10z)`.
///
/// Cells change at integer multiples of `π/10` along X and Z.
pub struct CheckerTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { even, odd }
    }

    pub fn from_colors(even: Color, odd: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(even)), Arc::new(SolidColor::new(odd)))
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like pattern: a sine along Z phase-shifted by Perlin turbulence.
pub struct NoiseTexture {
    noise: Arc<Perlin>,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(noise: Arc<Perlin>, scale: f32) -> Self {
        Self { noise, scale }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let turbulence = self.noise.turbulence(p, DEFAULT_TURBULENCE_DEPTH);
        Color::ONE * 0.5 * (1.0 + (self.scale * p.z + 10.0 * turbulence).sin())
    }
}

/// Nearest-pixel lookup into a decoded RGB image.
pub struct ImageTexture {
    image: Arc<ImageData>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let width = self.image.width();
        let height = self.image.height();

        // v = 1 is the top row of the image
        let i = (u * width as f32) as i64;
        let j = ((1.0 - v) * height as f32 - 0.001) as i64;
        let i = i.clamp(0, width as i64 - 1) as u32;
        let j = j.clamp(0, height as i64 - 1) as u32;

        let [r, g, b] = self.image.rgb(i, j);
        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}
