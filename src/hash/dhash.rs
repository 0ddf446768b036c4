//! Difference hash: gradient sign between neighbouring samples.
//!
//! The horizontal pass works on an `(s+1) x s` resize and the vertical pass on
//! a separate `s x (s+1)` resize. Sharing one `(s+1) x (s+1)` grid would
//! resample differently and change every stored fingerprint.

use super::bits::BitPacker;
use super::sampler::{PixelGrid, PixelSampler};
use super::validate_side;
use crate::error::Result;

/// Horizontal gradient over a grid of `(s+1) x s`.
///
/// Row by row, left to right; bit is 1 when the left neighbour is darker.
pub fn horizontal_grid(grid: &PixelGrid) -> Result<Vec<u8>> {
    let side = grid.height();
    grid.expect_shape(side + 1, side)?;

    let mut packer = BitPacker::for_bits(side as usize * side as usize)?;
    for row in grid.rows() {
        for pair in row.windows(2) {
            packer.append_bit(pair[0] < pair[1])?;
        }
    }
    Ok(packer.finish())
}

/// Vertical gradient over a grid of `s x (s+1)`.
///
/// Column by column, top to bottom; bit is 1 when the sample above is darker.
pub fn vertical_grid(grid: &PixelGrid) -> Result<Vec<u8>> {
    let side = grid.width();
    grid.expect_shape(side, side + 1)?;

    let mut packer = BitPacker::for_bits(side as usize * side as usize)?;
    for x in 0..side {
        let mut prev = grid.get(x, 0);
        for y in 1..=side {
            let current = grid.get(x, y);
            packer.append_bit(prev < current)?;
            prev = current;
        }
    }
    Ok(packer.finish())
}

pub fn horizontal_from_sampler(sampler: &PixelSampler, side: u32) -> Result<Vec<u8>> {
    validate_side(side)?;
    horizontal_grid(&sampler.sample(side + 1, side)?)
}

pub fn vertical_from_sampler(sampler: &PixelSampler, side: u32) -> Result<Vec<u8>> {
    validate_side(side)?;
    vertical_grid(&sampler.sample(side, side + 1)?)
}

/// Horizontal bits followed by vertical bits
pub fn from_sampler(sampler: &PixelSampler, side: u32) -> Result<Vec<u8>> {
    let mut bytes = horizontal_from_sampler(sampler, side)?;
    bytes.extend(vertical_from_sampler(sampler, side)?);
    Ok(bytes)
}
