//! Surface textures for bodies.
//!
//! Textures are decoded on the CPU into RGBA8 and uploaded once when the
//! renderer starts. A body without a texture, or whose texture fails to
//! load or exceeds the device's size limit, is drawn with a 1x1 white
//! texture so its tint shows through.
//!
//! # Supported Formats
//!
//! - PNG
//! - JPEG

use std::path::Path;

use crate::error::TextureError;

/// Decoded texture ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureConfig {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
}

impl TextureConfig {
    /// Create a texture from raw RGBA data.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "RGBA data size mismatch"
        );
        Self { data, width, height }
    }

    /// Load a texture from an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path.as_ref())?.into_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            data: img.into_raw(),
            width,
            height,
        })
    }

    /// A 1x1 texture of a single colour.
    pub fn solid(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_rgba(vec![r, g, b, a], 1, 1)
    }

    /// A 1x1 opaque white texture.
    pub fn white() -> Self {
        Self::solid(255, 255, 255, 255)
    }

    /// Load `path` if given, falling back to white with a warning.
    ///
    /// Images wider or taller than `max_dimension` are rejected as well.
    pub fn load_or_white(path: Option<&Path>, max_dimension: u32) -> Self {
        let Some(path) = path else {
            return Self::white();
        };
        match Self::from_file(path) {
            Ok(texture) if texture.fits(max_dimension) => texture,
            Ok(texture) => {
                log::warn!(
                    "Texture '{}' is {}x{}, over the device limit of {}; using tint only",
                    path.display(),
                    texture.width,
                    texture.height,
                    max_dimension
                );
                Self::white()
            }
            Err(e) => {
                log::warn!("Texture '{}' unavailable, using tint only: {}", path.display(), e);
                Self::white()
            }
        }
    }

    /// Whether both sides are within `max_dimension` pixels.
    pub fn fits(&self, max_dimension: u32) -> bool {
        self.width <= max_dimension && self.height <= max_dimension
    }

    /// Bytes per row as uploaded.
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}
