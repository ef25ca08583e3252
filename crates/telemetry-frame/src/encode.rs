//! Frame writers for the three wire layouts.
//!
//! Used by the bench simulator and by tests to produce buffers the decoder
//! accepts. Padding bytes are always written as zero.

use crate::frame::BusFrame;
use crate::layout::WireLayout;

/// Append `frame` to `out` in `layout`, returning the bytes written.
///
/// `timestamp` is only written by the fixed-size layouts.
pub fn encode_frame(frame: &BusFrame, layout: WireLayout, timestamp: u32, out: &mut Vec<u8>) -> usize {
    let start = out.len();
    out.extend_from_slice(&frame.flags.to_le_bytes());
    out.extend_from_slice(&frame.bus_id.to_le_bytes());
    out.push(frame.dlc());

    match layout {
        WireLayout::Padded24 => {
            out.extend_from_slice(&[0u8; 3]);
            out.extend_from_slice(frame.padded());
            out.extend_from_slice(&timestamp.to_le_bytes());
        }
        WireLayout::Packed21 => {
            out.extend_from_slice(frame.padded());
            out.extend_from_slice(&timestamp.to_le_bytes());
        }
        WireLayout::Minimal => out.extend_from_slice(frame.payload()),
    }

    out.len().saturating_sub(start)
}

/// Encode every frame in `frames` back to back into a fresh buffer.
pub fn encode_frames<'a, I>(frames: I, layout: WireLayout, timestamp: u32) -> Vec<u8>
where
    I: IntoIterator<Item = &'a BusFrame>,
{
    let mut out = Vec::new();
    for frame in frames {
        encode_frame(frame, layout, timestamp, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_written_length_matches_layout() -> TestResult {
        let frame = BusFrame::new(0x008, &[1, 2, 3, 4, 5])?;
        for layout in WireLayout::PRIORITY {
            let mut out = Vec::new();
            let written = encode_frame(&frame, layout, 7, &mut out);
            assert_eq!(written, layout.encoded_len(5));
            assert_eq!(out.len(), written);
        }
        Ok(())
    }

    #[test]
    fn test_padded_reserved_bytes_are_zero() -> TestResult {
        let frame = BusFrame::new(0x007, &[0xFF])?.with_flags(0xDEAD_BEEF);
        let mut out = Vec::new();
        encode_frame(&frame, WireLayout::Padded24, 0x0102_0304, &mut out);
        assert_eq!(out.get(0..4), Some(&0xDEAD_BEEFu32.to_le_bytes()[..]));
        assert_eq!(out.get(9..12), Some(&[0u8, 0, 0][..]));
        assert_eq!(out.get(12), Some(&0xFF));
        assert_eq!(out.get(20..24), Some(&0x0102_0304u32.to_le_bytes()[..]));
        Ok(())
    }

    #[test]
    fn test_encode_frames_concatenates() -> TestResult {
        let frames = [BusFrame::new(0x004, &[1, 2])?, BusFrame::new(0x005, &[])?];
        let out = encode_frames(&frames, WireLayout::Minimal, 0);
        assert_eq!(out.len(), 11 + 9);
        Ok(())
    }
}
