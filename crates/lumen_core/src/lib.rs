//! Lumen Core - asset loading shared by the renderer and its front ends.
//!
//! This crate provides:
//!
//! - **Decoded images**: `ImageData`, a flat RGB byte buffer consumed by
//!   image-sampled textures
//! - **Image loading**: `load_image`, decoding any format the `image`
//!   crate understands
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::load_image;
//!
//! let earth = load_image("assets/earthmap.jpg")?;
//! println!("{}x{}", earth.width(), earth.height());
//! ```

pub mod image;

pub use crate::image::{load_image, ImageData, ImageError, ImageResult};
