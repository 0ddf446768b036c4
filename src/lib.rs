//! sniffhash Library
//!
//! Content sniffing and perceptual fingerprints for stored blobs.
//!
//! # Features
//!
//! - **Signature Sniffing**: Ordered byte-signature table over the first 512 bytes
//! - **Perceptual Hashing**: ahash and dhash over 16-bit grayscale samples
//! - **Blob Analysis**: MIME type plus fingerprints for raster images
//! - **Parallel Scanning**: Re-classifies directory trees with rayon
//!
//! # Example
//!
//! ```no_run
//! use sniffhash::{classify, HashAlgorithm};
//!
//! fn main() -> anyhow::Result<()> {
//!     let data = std::fs::read("photo.png")?;
//!     println!("type: {}", classify(&data));
//!
//!     let image = image::load_from_memory(&data)?;
//!     let fingerprint = HashAlgorithm::Difference.compute(&image, 32)?;
//!     println!("dhash: {}", fingerprint.to_hex());
//!     Ok(())
//! }
//! ```

pub mod analyze;
pub mod cli;
pub mod config;
pub mod error;
pub mod hash;
pub mod scan;
pub mod sniff;

// Re-export commonly used types
pub use analyze::{analyze_blob, analyze_classified, is_hashable, BlobReport, HASHABLE_TYPES};
pub use config::Config;
pub use error::{HashError, Result, SignatureError};
pub use hash::{
    average_hash, difference_hash, difference_hash_horizontal, difference_hash_vertical,
    BitPacker, Fingerprint, HashAlgorithm, PixelGrid, PixelSampler,
};
pub use scan::{scan, ScanEntry, ScanOptions, ScanReport};
pub use sniff::{classify, classify_reader, SignatureRule, Sniffer, SIGNATURES};
