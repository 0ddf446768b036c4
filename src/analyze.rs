//! Analyze module - Sniff a stored blob and fingerprint it when it is an image
//!
//! Mirrors what an upload handler needs per object: a MIME type always, and
//! ahash/dhash hex strings for raster images. Fingerprint failures are
//! logged and the field left empty rather than failing the whole analysis.

use serde::{Deserialize, Serialize};

use crate::config::HashConfig;
use crate::hash::{HashAlgorithm, PixelSampler};
use crate::sniff;

/// MIME types that are decoded and fingerprinted
pub const HASHABLE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Whether blobs of this MIME type get fingerprints
pub fn is_hashable(mime: &str) -> bool {
    HASHABLE_TYPES.contains(&mime)
}

/// Classification and fingerprints for one blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobReport {
    pub mime: String,
    pub size: u64,
    /// Side length the fingerprints were computed at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ahash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhash: Option<String>,
}

impl BlobReport {
    pub fn has_fingerprints(&self) -> bool {
        self.ahash.is_some() || self.dhash.is_some()
    }
}

/// Sniff `data` and, for hashable images, compute ahash and dhash.
///
/// Never fails. A blob that sniffs as an image but does not decode gets a
/// report with no fingerprints.
pub fn analyze_blob(data: &[u8], settings: &HashConfig) -> BlobReport {
    analyze_classified(data, sniff::classify(data), settings)
}

/// [`analyze_blob`] for a blob whose type is already known.
///
/// `mime` is trusted as-is; `data` is not sniffed again.
pub fn analyze_classified(data: &[u8], mime: &str, settings: &HashConfig) -> BlobReport {
    let mut report = BlobReport {
        mime: mime.to_string(),
        size: data.len() as u64,
        hash_size: None,
        ahash: None,
        dhash: None,
    };

    if !settings.enabled || !is_hashable(mime) {
        return report;
    }

    tracing::debug!(mime, size = settings.size, "computing ahash and dhash");
    let sampler = match PixelSampler::from_bytes(data) {
        Ok(sampler) => sampler,
        Err(e) => {
            tracing::warn!("Failed to decode {} blob: {}", mime, e);
            return report;
        }
    };

    let side = settings.size;
    let (ahash, dhash) = rayon::join(
        || HashAlgorithm::Average.compute_sampled(&sampler, side),
        || HashAlgorithm::Difference.compute_sampled(&sampler, side),
    );

    report.ahash = match ahash {
        Ok(fp) => Some(fp.to_hex()),
        Err(e) => {
            tracing::warn!("Failed to generate ahash: {}", e);
            None
        }
    };
    report.dhash = match dhash {
        Ok(fp) => Some(fp.to_hex()),
        Err(e) => {
            tracing::warn!("Failed to generate dhash: {}", e);
            None
        }
    };
    if report.has_fingerprints() {
        report.hash_size = Some(side);
    }
    report
}
