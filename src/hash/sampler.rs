//! Grayscale downsampling for perceptual hashing.
//!
//! The sampler converts once to 16-bit luma (BT.709 weights, as applied by
//! `image`'s `to_luma16`) and resizes with Lanczos3. Both choices feed
//! directly into fingerprint values, so changing either invalidates every
//! stored fingerprint.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, Luma};

use crate::error::{HashError, Result};

/// Resampling filter used for every fingerprint
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

type GrayImage16 = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Grayscale samples in raster (row-major) order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    samples: Vec<u16>,
}

impl PixelGrid {
    /// Build a grid from raw row-major samples.
    ///
    /// Returns `None` for an empty shape or when `samples.len() != width * height`.
    pub fn from_samples(width: u32, height: u32, samples: Vec<u16>) -> Option<Self> {
        if width == 0 || height == 0 || samples.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample at column `x`, row `y`
    pub fn get(&self, x: u32, y: u32) -> u16 {
        self.samples[y as usize * self.width as usize + x as usize]
    }

    /// All samples, row-major
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u16]> {
        self.samples.chunks(self.width as usize)
    }

    pub(crate) fn expect_shape(&self, width: u32, height: u32) -> Result<()> {
        if self.width != width || self.height != height {
            return Err(HashError::GridShape {
                width: self.width,
                height: self.height,
                expected_width: width,
                expected_height: height,
            });
        }
        Ok(())
    }
}

/// Holds a grayscaled image and produces resized [`PixelGrid`]s
pub struct PixelSampler {
    gray: GrayImage16,
}

impl PixelSampler {
    /// Grayscale a decoded image
    pub fn new(image: &DynamicImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(HashError::Decode(format!(
                "image has no pixels ({}x{})",
                image.width(),
                image.height()
            )));
        }
        Ok(Self {
            gray: image.to_luma16(),
        })
    }

    /// Decode an encoded image (JPEG, PNG, GIF, WebP, BMP) and grayscale it
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)?;
        Self::new(&image)
    }

    /// Width and height of the source image
    pub fn source_dimensions(&self) -> (u32, u32) {
        self.gray.dimensions()
    }

    /// Resize to exactly `width x height`
    pub fn sample(&self, width: u32, height: u32) -> Result<PixelGrid> {
        if width == 0 || height == 0 {
            return Err(HashError::InvalidSize {
                side: 0,
                max: super::MAX_SIDE,
            });
        }
        let resized = imageops::resize(&self.gray, width, height, RESAMPLE_FILTER);
        Ok(PixelGrid {
            width,
            height,
            samples: resized.into_raw(),
        })
    }
}
