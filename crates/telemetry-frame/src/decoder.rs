//! Frame boundary recovery.
//!
//! Decoding never allocates and never reads past the end of the input.

use trackside_errors::FrameError;
use trackside_errors::frame::{MAX_DLC, MIN_HEADER_LEN};

use crate::frame::{BusFrame, DecodedFrame};
use crate::layout::{LayoutPolicy, OFF_DLC, OFF_FLAGS, OFF_ID, WireLayout};

fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset.checked_add(4)?)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
}

/// Decode the first frame of `buf`, picking the layout from its length.
///
/// # Errors
///
/// Returns [`FrameError::BufferTooShort`] when fewer than 9 bytes remain,
/// [`FrameError::InvalidDataLength`] when the header declares more than 8
/// data bytes and [`FrameError::TruncatedPayload`] when a minimal-layout
/// frame declares more data than the buffer holds.
pub fn decode_next(buf: &[u8]) -> Result<DecodedFrame, FrameError> {
    decode_next_with(buf, LayoutPolicy::Auto)
}

/// Decode the first frame of `buf` under an explicit layout policy.
///
/// # Errors
///
/// Same as [`decode_next`]; with a pinned fixed-size layout
/// `BufferTooShort` reports that layout's size as the requirement.
pub fn decode_next_with(buf: &[u8], policy: LayoutPolicy) -> Result<DecodedFrame, FrameError> {
    let layout = policy
        .resolve(buf.len())
        .ok_or(FrameError::too_short(buf.len()))?;

    if buf.len() < layout.min_len() {
        return Err(FrameError::BufferTooShort {
            available: buf.len(),
            required: layout.min_len(),
        });
    }

    let (Some(flags), Some(bus_id), Some(&dlc)) = (
        read_u32_le(buf, OFF_FLAGS),
        read_u32_le(buf, OFF_ID),
        buf.get(OFF_DLC),
    ) else {
        return Err(FrameError::too_short(buf.len()));
    };

    if dlc > MAX_DLC {
        return Err(FrameError::InvalidDataLength { dlc });
    }

    let start = layout.data_offset();
    let consumed = layout.encoded_len(dlc);
    let block = match layout {
        WireLayout::Padded24 | WireLayout::Packed21 => buf.get(start..start.saturating_add(8)),
        WireLayout::Minimal => buf.get(start..consumed),
    }
    .ok_or(FrameError::TruncatedPayload {
        dlc,
        available: buf.len().saturating_sub(MIN_HEADER_LEN),
    })?;

    Ok(DecodedFrame {
        frame: BusFrame::from_block(flags, bus_id, dlc, block)?,
        layout,
        consumed,
    })
}

/// Iterator over the frames of one delivered buffer.
///
/// Yields frames in buffer order. The first error is yielded once and ends
/// iteration; frames before it remain valid. Trailing bytes are never
/// silently dropped: a short tail surfaces as [`FrameError::BufferTooShort`].
#[derive(Debug, Clone)]
pub struct FrameReader<'a> {
    buf: &'a [u8],
    offset: usize,
    policy: LayoutPolicy,
    failed: bool,
}

impl<'a> FrameReader<'a> {
    /// Read frames with automatic layout detection.
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_policy(buf, LayoutPolicy::Auto)
    }

    /// Read frames that all use one known layout.
    pub fn with_layout(buf: &'a [u8], layout: WireLayout) -> Self {
        Self::with_policy(buf, LayoutPolicy::Pinned(layout))
    }

    /// Read frames under an explicit policy.
    pub fn with_policy(buf: &'a [u8], policy: LayoutPolicy) -> Self {
        Self {
            buf,
            offset: 0,
            policy,
            failed: false,
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        self.buf.get(self.offset..).unwrap_or(&[])
    }
}

impl Iterator for FrameReader<'_> {
    type Item = Result<DecodedFrame, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let rest = self.remaining();
        if rest.is_empty() {
            return None;
        }
        match decode_next_with(rest, self.policy) {
            Ok(decoded) => {
                self.offset = self.offset.saturating_add(decoded.consumed);
                Some(Ok(decoded))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl core::iter::FusedIterator for FrameReader<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn header(bus_id: u32, dlc: u8) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&bus_id.to_le_bytes());
        buf.push(dlc);
        buf
    }

    #[test]
    fn test_padded_layout_skips_reserved_bytes() -> TestResult {
        let mut buf = header(0x007, 2);
        buf.extend_from_slice(&[0xEE, 0xEE, 0xEE]); // reserved
        buf.extend_from_slice(&[0x11, 0x22, 0x33, 0x44, 0, 0, 0, 0]);
        buf.extend_from_slice(&[0xFF; 4]); // timestamp
        let decoded = decode_next(&buf)?;
        assert_eq!(decoded.layout, WireLayout::Padded24);
        assert_eq!(decoded.consumed, 24);
        assert_eq!(decoded.frame.payload(), &[0x11, 0x22]);
        assert_eq!(decoded.frame.word(), 0x2211);
        Ok(())
    }

    #[test]
    fn test_packed_layout() -> TestResult {
        let mut buf = header(0x006, 8);
        buf.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        buf.extend_from_slice(&[0; 4]);
        let decoded = decode_next(&buf)?;
        assert_eq!(decoded.layout, WireLayout::Packed21);
        assert_eq!(decoded.consumed, 21);
        assert_eq!(decoded.frame.bus_id, 0x006);
        assert_eq!(decoded.frame.payload(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        Ok(())
    }

    #[test]
    fn test_minimal_truncated_payload() -> TestResult {
        let mut buf = header(0x009, 8);
        buf.extend_from_slice(&[1, 2, 3]);
        let err = decode_next(&buf).err();
        assert_eq!(
            err,
            Some(FrameError::TruncatedPayload {
                dlc: 8,
                available: 3
            })
        );
        Ok(())
    }

    #[test]
    fn test_invalid_dlc() -> TestResult {
        let buf = header(0x004, 9);
        assert_eq!(
            decode_next(&buf).err(),
            Some(FrameError::InvalidDataLength { dlc: 9 })
        );
        Ok(())
    }

    #[test]
    fn test_too_short() -> TestResult {
        assert_eq!(
            decode_next(&[0u8; 8]).err(),
            Some(FrameError::too_short(8))
        );
        assert_eq!(decode_next(&[]).err(), Some(FrameError::too_short(0)));
        Ok(())
    }

    #[test]
    fn test_pinned_padded_reports_its_size() -> TestResult {
        let buf = header(0x004, 0);
        let err = decode_next_with(&buf, LayoutPolicy::Pinned(WireLayout::Padded24)).err();
        assert_eq!(
            err,
            Some(FrameError::BufferTooShort {
                available: 9,
                required: 24
            })
        );
        Ok(())
    }

    #[test]
    fn test_reader_stops_after_first_error() -> TestResult {
        let mut buf = header(0x005, 0);
        buf.extend_from_slice(&[0u8; 3]);
        let mut reader = FrameReader::with_layout(&buf, WireLayout::Minimal);
        assert!(matches!(reader.next(), Some(Ok(_))));
        assert_eq!(reader.offset(), 9);
        assert_eq!(reader.remaining().len(), 3);
        assert_eq!(reader.next(), Some(Err(FrameError::too_short(3))));
        assert_eq!(reader.next(), None);
        Ok(())
    }
}
