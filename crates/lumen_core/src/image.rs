//! Decoded image buffers for image-sampled textures.
//!
//! The renderer never touches the filesystem. Front ends decode images
//! here and hand the resulting [`ImageData`] to the texture that samples it.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while acquiring image data.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to load image {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: ::image::ImageError,
    },

    #[error("Image has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGB")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type ImageResult<T> = Result<T, ImageError>;

/// A decoded 8-bit RGB image.
///
/// Pixels are stored row-major, top row first, three bytes per pixel.
#[derive(Clone, Debug)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageData {
    /// Wrap an RGB byte buffer, checking it matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> ImageResult<Self> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty { width, height });
        }

        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(ImageError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGB bytes of the pixel at column `x`, row `y` (row 0 is the top).
    ///
    /// Coordinates are clamped into the image.
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = 3 * (y * self.width as usize + x);
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }
}

/// Decode an image file into an RGB buffer.
///
/// Alpha channels are dropped. Values are kept as stored; no color-space
/// conversion is applied.
pub fn load_image(path: impl AsRef<Path>) -> ImageResult<ImageData> {
    let path = path.as_ref();

    let img = ::image::open(path).map_err(|source| ImageError::Load {
        path: path.display().to_string(),
        source,
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let data = ImageData::new(width, height, rgb.into_raw())?;

    log::debug!(
        "Loaded image: {} ({}x{}, {:.1} KB)",
        path.display(),
        width,
        height,
        data.pixels.len() as f32 / 1024.0
    );

    Ok(data)
}
