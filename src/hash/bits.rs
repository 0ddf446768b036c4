//! Fixed-capacity bit accumulator for fingerprints.
//!
//! Bits are packed most-significant-bit first. Calling [`BitPacker::finish`]
//! before the packer is full zero-pads the remaining bits.

use crate::error::{HashError, Result};

/// Packs individual bits into a byte vector of fixed capacity
#[derive(Debug, Clone)]
pub struct BitPacker {
    bytes: Vec<u8>,
    capacity_bits: usize,
    len: usize,
}

impl BitPacker {
    /// Create a packer holding exactly `capacity_bits` bits.
    ///
    /// `capacity_bits` must be positive and a multiple of 8.
    pub fn new(capacity_bits: usize) -> Result<Self> {
        if capacity_bits == 0 || capacity_bits % 8 != 0 {
            return Err(HashError::InvalidCapacity { capacity_bits });
        }
        Ok(Self {
            bytes: vec![0u8; capacity_bits / 8],
            capacity_bits,
            len: 0,
        })
    }

    /// Create a packer large enough for `bits` bits, rounded up to a whole byte
    pub fn for_bits(bits: usize) -> Result<Self> {
        Self::new(bits.div_ceil(8) * 8)
    }

    /// Append one bit (`true` = 1)
    pub fn append_bit(&mut self, bit: bool) -> Result<()> {
        if self.len == self.capacity_bits {
            return Err(HashError::Overflow {
                capacity_bits: self.capacity_bits,
            });
        }
        if bit {
            self.bytes[self.len / 8] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
        Ok(())
    }

    /// Number of bits appended so far
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity_bits(&self) -> usize {
        self.capacity_bits
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity_bits
    }

    /// Consume the packer and return `capacity_bits / 8` bytes
    pub fn finish(self) -> Vec<u8> {
        if !self.is_full() {
            tracing::trace!(
                written = self.len,
                capacity = self.capacity_bits,
                "zero-padding partial bit sequence"
            );
        }
        self.bytes
    }
}
