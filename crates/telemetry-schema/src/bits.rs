//! Bit-field and byte-field extraction over zero-extended payloads.
//!
//! Payloads shorter than 8 bytes are treated as if padded with zero bytes.
//! Extraction never panics; callers decide separately whether a field is
//! fully covered by the bytes actually present.

/// Zero-extend up to 8 payload bytes into a little-endian word.
pub fn payload_word(payload: &[u8]) -> u64 {
    let mut block = [0u8; 8];
    for (dst, src) in block.iter_mut().zip(payload) {
        *dst = *src;
    }
    u64::from_le_bytes(block)
}

/// Mask with the low `width` bits set.
pub fn mask(width: u32) -> u64 {
    1u64.checked_shl(width)
        .map_or(u64::MAX, |bit| bit.wrapping_sub(1))
}

/// Unsigned field: `(word >> offset) & ((1 << width) - 1)`.
pub fn extract_bits(word: u64, offset: u32, width: u32) -> u64 {
    word.checked_shr(offset).unwrap_or(0) & mask(width)
}

/// Whether a bit field lies within `payload_len` bytes.
pub fn bits_covered(offset: u32, width: u32, payload_len: usize) -> bool {
    let end = u64::from(offset).saturating_add(u64::from(width));
    let available = u64::try_from(payload_len)
        .unwrap_or(u64::MAX)
        .saturating_mul(8);
    end <= available
}

/// Whether `size` bytes at `byte` lie within `payload_len` bytes.
pub fn bytes_covered(byte: usize, size: usize, payload_len: usize) -> bool {
    byte.checked_add(size).is_some_and(|end| end <= payload_len)
}

/// Signed little-endian 16-bit value at `byte`.
pub fn read_i16_le(payload: &[u8], byte: usize) -> Option<i16> {
    payload
        .get(byte..byte.checked_add(2)?)
        .and_then(|b| b.try_into().ok())
        .map(i16::from_le_bytes)
}

/// Little-endian IEEE single at `byte`.
pub fn read_f32_le(payload: &[u8], byte: usize) -> Option<f32> {
    payload
        .get(byte..byte.checked_add(4)?)
        .and_then(|b| b.try_into().ok())
        .map(f32::from_le_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_zero_extends() {
        assert_eq!(payload_word(&[]), 0);
        assert_eq!(payload_word(&[0x01]), 1);
        assert_eq!(payload_word(&[0x34, 0x12]), 0x1234);
        assert_eq!(payload_word(&[0xFF; 8]), u64::MAX);
    }

    #[test]
    fn test_mask_edges() {
        assert_eq!(mask(0), 0);
        assert_eq!(mask(1), 1);
        assert_eq!(mask(11), 0x7FF);
        assert_eq!(mask(64), u64::MAX);
    }

    #[test]
    fn test_extract_bits() {
        let word = 0b1010_1100u64;
        assert_eq!(extract_bits(word, 2, 3), 0b011);
        assert_eq!(extract_bits(word, 4, 4), 0b1010);
        assert_eq!(extract_bits(word, 64, 8), 0);
        assert_eq!(extract_bits(u64::MAX, 54, 8), 0xFF);
    }

    #[test]
    fn test_coverage() {
        assert!(bits_covered(0, 11, 2));
        assert!(!bits_covered(11, 11, 2));
        assert!(bits_covered(54, 8, 8));
        assert!(!bits_covered(54, 8, 7));
        assert!(bytes_covered(6, 2, 8));
        assert!(!bytes_covered(6, 2, 7));
        assert!(!bytes_covered(usize::MAX, 2, 8));
    }

    #[test]
    fn test_read_signed_and_float() {
        assert_eq!(read_i16_le(&[0xFF, 0xFF], 0), Some(-1));
        assert_eq!(read_i16_le(&[0x00, 0x80], 0), Some(i16::MIN));
        assert_eq!(read_i16_le(&[0x00], 0), None);
        assert_eq!(
            read_f32_le(&1.5f32.to_le_bytes(), 0).map(f32::to_bits),
            Some(1.5f32.to_bits())
        );
        assert_eq!(read_f32_le(&[0; 7], 4), None);
    }
}
