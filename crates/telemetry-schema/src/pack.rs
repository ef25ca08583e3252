//! Payload construction: the inverse of the decode rules.
//!
//! Used by the bench simulator and by tests to place known values at their
//! documented offsets.

use crate::bits::mask;

/// Builds a bus payload field by field.
///
/// Bit fields are masked to their width; later writes overwrite earlier
/// ones where they overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadBuilder {
    data: [u8; 8],
    len: usize,
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadBuilder {
    /// Full 8-byte payload.
    pub fn new() -> Self {
        Self::with_len(8)
    }

    /// Payload of `len` bytes (clamped to 8).
    pub fn with_len(len: usize) -> Self {
        Self {
            data: [0u8; 8],
            len: len.min(8),
        }
    }

    /// Write an unsigned bit field.
    pub fn bits(mut self, offset: u32, width: u32, value: u64) -> Self {
        let field_mask = mask(width).checked_shl(offset).unwrap_or(0);
        let placed = (value & mask(width)).checked_shl(offset).unwrap_or(0);
        let word = u64::from_le_bytes(self.data);
        self.data = ((word & !field_mask) | placed).to_le_bytes();
        self
    }

    fn bytes(mut self, byte: usize, src: &[u8]) -> Self {
        if let Some(dst) = byte
            .checked_add(src.len())
            .and_then(|end| self.data.get_mut(byte..end))
        {
            dst.copy_from_slice(src);
        }
        self
    }

    /// Write a signed 16-bit little-endian value.
    pub fn i16(self, byte: usize, value: i16) -> Self {
        self.bytes(byte, &value.to_le_bytes())
    }

    /// Write a single-precision float.
    pub fn f32(self, byte: usize, value: f32) -> Self {
        self.bytes(byte, &value.to_le_bytes())
    }

    /// The payload bytes.
    pub fn build(&self) -> Vec<u8> {
        self.data.get(..self.len).unwrap_or(&[]).to_vec()
    }
}
