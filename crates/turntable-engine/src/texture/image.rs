use std::path::Path;

use super::TextureError;

/// Decode-time options.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    /// Flip rows so texture coordinates with a bottom-left origin sample the
    /// image upright.
    pub flip_y: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self { flip_y: true }
    }
}

/// Decoded RGBA8 image, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageAsset {
    pub fn open(path: &Path, options: ImageOptions) -> Result<Self, TextureError> {
        let img = ::image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_dynamic(img, options)
    }

    /// Decodes an in-memory encoded image (PNG, JPEG).
    pub fn decode(bytes: &[u8], options: ImageOptions) -> Result<Self, TextureError> {
        let img = ::image::load_from_memory(bytes).map_err(|source| TextureError::Decode {
            path: "<memory>".into(),
            source,
        })?;
        Self::from_dynamic(img, options)
    }

    fn from_dynamic(img: ::image::DynamicImage, options: ImageOptions) -> Result<Self, TextureError> {
        let mut rgba = img.to_rgba8();
        if rgba.width() == 0 || rgba.height() == 0 {
            return Err(TextureError::Empty);
        }
        if options.flip_y {
            ::image::imageops::flip_vertical_in_place(&mut rgba);
        }
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGBA8 rows.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
