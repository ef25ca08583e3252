//! Decoded bus frame types.

use trackside_errors::FrameError;
use trackside_errors::frame::MAX_DLC;

use crate::layout::WireLayout;

/// One bus frame with its payload normalized to a zero-padded 8-byte block.
///
/// Bytes beyond `dlc` are always zero, so `word()` is the payload
/// zero-extended to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BusFrame {
    /// Controller-side frame flags (extended id, remote request, ...).
    pub flags: u32,
    /// Bus identifier.
    pub bus_id: u32,
    dlc: u8,
    data: [u8; 8],
}

impl BusFrame {
    /// Build a frame from a payload of at most 8 bytes.
    pub fn new(bus_id: u32, payload: &[u8]) -> Result<Self, FrameError> {
        let dlc = u8::try_from(payload.len())
            .ok()
            .filter(|dlc| *dlc <= MAX_DLC)
            .ok_or(FrameError::InvalidDataLength {
                dlc: u8::try_from(payload.len()).unwrap_or(u8::MAX),
            })?;
        let mut data = [0u8; 8];
        for (dst, src) in data.iter_mut().zip(payload) {
            *dst = *src;
        }
        Ok(Self {
            flags: 0,
            bus_id,
            dlc,
            data,
        })
    }

    /// Build a frame from an 8-byte block, keeping only the low `dlc` bytes.
    pub(crate) fn from_block(
        flags: u32,
        bus_id: u32,
        dlc: u8,
        block: &[u8],
    ) -> Result<Self, FrameError> {
        if dlc > MAX_DLC {
            return Err(FrameError::InvalidDataLength { dlc });
        }
        let mut data = [0u8; 8];
        for (dst, src) in data.iter_mut().zip(block).take(usize::from(dlc)) {
            *dst = *src;
        }
        Ok(Self {
            flags,
            bus_id,
            dlc,
            data,
        })
    }

    /// Set the controller-side flags word.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Declared data-length code (0-8).
    pub fn dlc(&self) -> u8 {
        self.dlc
    }

    /// The semantically valid payload bytes.
    pub fn payload(&self) -> &[u8] {
        self.data.get(..usize::from(self.dlc)).unwrap_or(&[])
    }

    /// Payload zero-padded to 8 bytes.
    pub fn padded(&self) -> &[u8; 8] {
        &self.data
    }

    /// Payload zero-extended to a little-endian 64-bit word.
    pub fn word(&self) -> u64 {
        u64::from_le_bytes(self.data)
    }
}

/// A frame recovered from a buffer, with how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame {
    /// The decoded frame.
    pub frame: BusFrame,
    /// Layout that matched.
    pub layout: WireLayout,
    /// Bytes consumed from the front of the buffer.
    pub consumed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_new_rejects_oversized_payload() -> TestResult {
        let err = BusFrame::new(0x007, &[0u8; 9]).err();
        assert_eq!(err, Some(FrameError::InvalidDataLength { dlc: 9 }));
        Ok(())
    }

    #[test]
    fn test_payload_and_word() -> TestResult {
        let frame = BusFrame::new(0x006, &[0x01, 0x02])?;
        assert_eq!(frame.dlc(), 2);
        assert_eq!(frame.payload(), &[0x01, 0x02]);
        assert_eq!(frame.word(), 0x0201);
        assert_eq!(frame.padded(), &[0x01, 0x02, 0, 0, 0, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_from_block_drops_padding() -> TestResult {
        let block = [0xAA; 8];
        let frame = BusFrame::from_block(0, 0x009, 3, &block)?;
        assert_eq!(frame.payload(), &[0xAA, 0xAA, 0xAA]);
        assert_eq!(frame.word(), 0x00AA_AAAA);
        Ok(())
    }

    #[test]
    fn test_empty_payload() -> TestResult {
        let frame = BusFrame::new(0x004, &[])?;
        assert!(frame.payload().is_empty());
        assert_eq!(frame.word(), 0);
        Ok(())
    }
}
