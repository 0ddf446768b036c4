//! Average hash: one bit per sample, set when the sample is above the mean.

use super::bits::BitPacker;
use super::sampler::{PixelGrid, PixelSampler};
use super::validate_side;
use crate::error::Result;

/// Hash an `s x s` grid.
///
/// The mean is an integer floor of the sample sum, so a flat grid yields
/// all zero bits.
pub fn hash_grid(grid: &PixelGrid) -> Result<Vec<u8>> {
    let side = grid.width();
    grid.expect_shape(side, side)?;

    let samples = grid.samples();
    let sum: u64 = samples.iter().map(|&s| u64::from(s)).sum();
    let mean = sum / samples.len() as u64;

    let mut packer = BitPacker::for_bits(samples.len())?;
    for &sample in samples {
        packer.append_bit(u64::from(sample) > mean)?;
    }
    Ok(packer.finish())
}

/// Average hash from an already grayscaled sampler
pub fn from_sampler(sampler: &PixelSampler, side: u32) -> Result<Vec<u8>> {
    validate_side(side)?;
    let grid = sampler.sample(side, side)?;
    hash_grid(&grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strictly_greater() {
        // mean = (0 + 10 + 20 + 10) / 4 = 10
        let grid = PixelGrid::from_samples(2, 2, vec![0, 10, 20, 10]).unwrap();
        assert_eq!(hash_grid(&grid).unwrap(), vec![0b0010_0000]);
    }

    #[test]
    fn test_raster_order() {
        let samples: Vec<u16> = (0..16).map(|i| if i % 5 == 0 { 1000 } else { 0 }).collect();
        let grid = PixelGrid::from_samples(4, 4, samples).unwrap();
        // bits set at indices 0, 5, 10, 15
        assert_eq!(hash_grid(&grid).unwrap(), vec![0b1000_0100, 0b0010_0001]);
    }

    #[test]
    fn test_flat_grid_is_all_zero() {
        let grid = PixelGrid::from_samples(8, 8, vec![4242; 64]).unwrap();
        assert_eq!(hash_grid(&grid).unwrap(), vec![0u8; 8]);
    }

    #[test]
    fn test_non_square_grid_rejected() {
        let grid = PixelGrid::from_samples(3, 2, vec![0; 6]).unwrap();
        assert!(hash_grid(&grid).is_err());
    }

    #[test]
    fn test_odd_side_pads_last_byte() {
        // 3x3 = 9 bits -> 2 bytes, last 7 bits zero
        let grid =
            PixelGrid::from_samples(3, 3, vec![9, 9, 9, 9, 9, 9, 9, 9, 100]).unwrap();
        assert_eq!(hash_grid(&grid).unwrap(), vec![0b0000_0000, 0b1000_0000]);
    }
}
