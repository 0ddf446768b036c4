//! Hash module - Perceptual image fingerprints
//!
//! Two fingerprint families over a grayscaled, Lanczos3-downsampled image:
//!
//! - **ahash**: `s*s` bits, set where a sample is above the grid mean
//! - **dhash**: `2*s*s` bits, horizontal then vertical gradient signs
//!
//! Fingerprints are `ceil(bits / 8)` bytes and are exchanged as lowercase
//! hex. Every call is self-contained; nothing is cached between calls.

pub mod ahash;
pub mod bits;
pub mod dhash;
pub mod sampler;

pub use bits::BitPacker;
pub use sampler::{PixelGrid, PixelSampler, RESAMPLE_FILTER};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::{HashError, Result};

/// Largest accepted side length
pub const MAX_SIDE: u32 = 1024;

/// Side length used when none is configured
pub const DEFAULT_SIDE: u32 = 32;

pub(crate) fn validate_side(side: u32) -> Result<()> {
    if side == 0 || side > MAX_SIDE {
        return Err(HashError::InvalidSize {
            side,
            max: MAX_SIDE,
        });
    }
    Ok(())
}

/// Byte length of an `s*s`-bit fingerprint
pub fn hash_len(side: u32) -> usize {
    (side as usize * side as usize).div_ceil(8)
}

/// Average hash of `image` at `side x side`
pub fn average_hash(image: &DynamicImage, side: u32) -> Result<Vec<u8>> {
    validate_side(side)?;
    ahash::from_sampler(&PixelSampler::new(image)?, side)
}

/// Difference hash of `image`: horizontal bits followed by vertical bits
pub fn difference_hash(image: &DynamicImage, side: u32) -> Result<Vec<u8>> {
    validate_side(side)?;
    dhash::from_sampler(&PixelSampler::new(image)?, side)
}

/// Horizontal half of [`difference_hash`]
pub fn difference_hash_horizontal(image: &DynamicImage, side: u32) -> Result<Vec<u8>> {
    validate_side(side)?;
    dhash::horizontal_from_sampler(&PixelSampler::new(image)?, side)
}

/// Vertical half of [`difference_hash`]
pub fn difference_hash_vertical(image: &DynamicImage, side: u32) -> Result<Vec<u8>> {
    validate_side(side)?;
    dhash::vertical_from_sampler(&PixelSampler::new(image)?, side)
}

/// Fingerprint algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// Mean threshold (ahash)
    Average,
    /// Horizontal + vertical gradient (dhash)
    #[default]
    Difference,
    /// Horizontal gradient only
    DifferenceHorizontal,
    /// Vertical gradient only
    DifferenceVertical,
}

impl HashAlgorithm {
    /// Short name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Average => "ahash",
            HashAlgorithm::Difference => "dhash",
            HashAlgorithm::DifferenceHorizontal => "dhash-h",
            HashAlgorithm::DifferenceVertical => "dhash-v",
        }
    }

    /// Fingerprint length in bytes at `side`
    pub fn byte_len(&self, side: u32) -> usize {
        match self {
            HashAlgorithm::Difference => 2 * hash_len(side),
            _ => hash_len(side),
        }
    }

    /// Hash a pre-grayscaled sampler
    pub fn compute_sampled(&self, sampler: &PixelSampler, side: u32) -> Result<Fingerprint> {
        let bytes = match self {
            HashAlgorithm::Average => ahash::from_sampler(sampler, side)?,
            HashAlgorithm::Difference => dhash::from_sampler(sampler, side)?,
            HashAlgorithm::DifferenceHorizontal => dhash::horizontal_from_sampler(sampler, side)?,
            HashAlgorithm::DifferenceVertical => dhash::vertical_from_sampler(sampler, side)?,
        };
        tracing::debug!(algorithm = self.name(), side, "computed fingerprint");
        Ok(Fingerprint {
            algorithm: *self,
            side,
            bytes,
        })
    }

    /// Hash a decoded image
    pub fn compute(&self, image: &DynamicImage, side: u32) -> Result<Fingerprint> {
        validate_side(side)?;
        self.compute_sampled(&PixelSampler::new(image)?, side)
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A computed fingerprint with the parameters needed to compare it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub algorithm: HashAlgorithm,
    /// Side length the image was sampled at
    pub side: u32,
    pub bytes: Vec<u8>,
}

impl Fingerprint {
    /// Lowercase hex, the storage and transport encoding
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parse a stored hex fingerprint, checking its length against `side`
    pub fn from_hex(hex_str: &str, algorithm: HashAlgorithm, side: u32) -> Result<Self> {
        validate_side(side)?;
        let bytes = hex::decode(hex_str)?;
        let expected = algorithm.byte_len(side);
        if bytes.len() != expected {
            return Err(HashError::Incompatible(format!(
                "{} at side {} is {} bytes, got {}",
                algorithm,
                side,
                expected,
                bytes.len()
            )));
        }
        Ok(Self {
            algorithm,
            side,
            bytes,
        })
    }

    /// Number of meaningful bits (excludes trailing padding)
    pub fn bit_len(&self) -> usize {
        let per_pass = self.side as usize * self.side as usize;
        match self.algorithm {
            HashAlgorithm::Difference => 2 * per_pass,
            _ => per_pass,
        }
    }

    /// Count of differing bits. Padding bits are always zero so they never
    /// contribute.
    pub fn hamming_distance(&self, other: &Self) -> Result<u32> {
        if self.algorithm != other.algorithm {
            return Err(HashError::Incompatible(format!(
                "algorithms differ: {} vs {}",
                self.algorithm, other.algorithm
            )));
        }
        if self.side != other.side || self.bytes.len() != other.bytes.len() {
            return Err(HashError::Incompatible(format!(
                "sizes differ: side {} ({} bytes) vs side {} ({} bytes)",
                self.side,
                self.bytes.len(),
                other.side,
                other.bytes.len()
            )));
        }
        Ok(self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum())
    }

    /// True when the Hamming distance is at most `threshold`
    pub fn is_similar(&self, other: &Self, threshold: u32) -> Result<bool> {
        Ok(self.hamming_distance(other)? <= threshold)
    }
}
