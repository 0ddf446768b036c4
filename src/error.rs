//! Error types for fingerprinting and signature construction
//!
//! Classification itself never fails: it always degrades to
//! `application/octet-stream`. Only building a rule at runtime can.

use thiserror::Error;

/// Fingerprinting errors
#[derive(Debug, Error)]
pub enum HashError {
    /// Target side length is zero or larger than [`crate::hash::MAX_SIDE`]
    #[error("invalid hash size {side}: must be between 1 and {max}")]
    InvalidSize { side: u32, max: u32 },

    /// Input could not be read as a raster
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Bit packer capacity is zero or not a whole number of bytes
    #[error("invalid bit capacity {capacity_bits}: must be a positive multiple of 8")]
    InvalidCapacity { capacity_bits: usize },

    /// Bit packer already holds its full capacity
    #[error("bit packer overflow: capacity of {capacity_bits} bits already reached")]
    Overflow { capacity_bits: usize },

    /// Sampled grid does not have the shape the engine expects
    #[error("pixel grid is {width}x{height}, expected {expected_width}x{expected_height}")]
    GridShape {
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },

    /// Two fingerprints cannot be compared
    #[error("incompatible fingerprints: {0}")]
    Incompatible(String),

    /// Hex text is not a valid fingerprint encoding
    #[error("invalid fingerprint hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

impl From<image::ImageError> for HashError {
    fn from(err: image::ImageError) -> Self {
        HashError::Decode(err.to_string())
    }
}

/// Result type for fingerprinting operations
pub type Result<T> = std::result::Result<T, HashError>;

/// Errors building a signature rule at runtime
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Pattern and mask must cover the same bytes
    #[error("masked signature pattern is {pattern_len} bytes but mask is {mask_len}")]
    MaskLength { pattern_len: usize, mask_len: usize },
}
